use crudkit_codegen::{
    CrudGenerator, GenerateOptions, GeneratedRelationFragment, GenerationReport, WriteOutcome,
};

use super::Context;

pub async fn run(
    context: &Context,
    table: &str,
    options: &GenerateOptions,
    dry_run: bool,
) -> anyhow::Result<()> {
    let provider = context.provider().await?;
    let generator = CrudGenerator::new(provider.as_ref(), &context.config, &context.project_root);

    if dry_run {
        let plan = generator.plan(table, options).await?;
        println!("🔍 Dry run for `{}` ({})", plan.table, plan.model_name);
        for artifact in &plan.artifacts {
            println!("   {:?}: {}", artifact.kind, artifact.path.display());
        }
        print_relations(plan.relations.fragments.iter().map(relation_line));
        return Ok(());
    }

    let report = generator.generate(table, options).await?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &GenerationReport) {
    println!("🛠️ Generated CRUD for `{}` ({})", report.table, report.model_name);

    for file in &report.files {
        let icon = match file.outcome {
            WriteOutcome::Created => "✅",
            WriteOutcome::Updated | WriteOutcome::Appended => "✏️",
            WriteOutcome::Unchanged | WriteOutcome::AlreadyPresent => "•",
            WriteOutcome::Skipped => "⏭️",
        };
        println!("   {} {:?} {}", icon, file.outcome, file.path.display());
    }

    print_relations(report.relations.iter().map(relation_line));

    if report.files.iter().any(|file| file.outcome == WriteOutcome::Skipped) {
        println!("\n💡 Existing classes were kept. Use --force to overwrite them.");
    }
}

fn relation_line(fragment: &GeneratedRelationFragment) -> (&String, &'static str, &String) {
    (&fragment.accessor_name, fragment.kind.method(), &fragment.type_name)
}

fn print_relations<'a>(relations: impl Iterator<Item = (&'a String, &'static str, &'a String)>) {
    let relations: Vec<_> = relations.collect();
    if relations.is_empty() {
        println!("\n🔗 No relations found");
        return;
    }

    println!("\n🔗 Relations:");
    for (accessor, method, model) in relations {
        println!("   {}() {} {}", accessor, method, model);
    }
}

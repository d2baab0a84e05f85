use crudkit_codegen::CrudGenerator;

use super::Context;

pub async fn run(
    context: &Context,
    table: &str,
    folder: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let provider = context.provider().await?;
    let generator = CrudGenerator::new(provider.as_ref(), &context.config, &context.project_root);

    if dry_run {
        let artifact = generator.plan_service(table, folder).await?;
        println!("🔍 Dry run: {}", artifact.path.display());
        return Ok(());
    }

    let file = generator.generate_service(table, folder).await?;
    println!("✅ Service created at {}", file.path.display());
    Ok(())
}

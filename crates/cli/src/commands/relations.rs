use anyhow::bail;
use crudkit_codegen::{ModelReplacementBuilder, RelationshipResolver};

use super::Context;

pub async fn run(context: &Context, table: &str, json: bool) -> anyhow::Result<()> {
    let provider = context.provider().await?;

    if !provider.has_table(table).await? {
        bail!("`{}` table does not exist", table);
    }

    let columns = provider.list_columns(table).await?;
    let base = ModelReplacementBuilder::new(&columns, &context.config.model.unwanted_columns)
        .base_properties();

    let resolver =
        RelationshipResolver::new(provider.as_ref(), context.config.model.namespace.as_str());
    let resolved = resolver.resolve(table, &base).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolved.fragments)?);
        return Ok(());
    }

    if resolved.is_empty() {
        println!("📭 `{}` has no foreign-key relations", table);
        return Ok(());
    }

    println!("🔗 Relations of `{}`:", table);
    for fragment in &resolved.fragments {
        let relation = &fragment.relation;
        println!(
            "   {:<24} {:<10} {:<6} {}.{} = {}.{}",
            format!("{}()", fragment.accessor_name),
            fragment.kind.method(),
            fragment.cardinality,
            if relation.is_outgoing() { table } else { relation.ref_table.as_str() },
            relation.foreign_key,
            if relation.is_outgoing() { relation.ref_table.as_str() } else { table },
            relation.local_key,
        );
    }

    println!("\n📝 Doc block:");
    println!("/**\n {}\n */", resolved.properties);

    Ok(())
}

use super::Context;

pub async fn run(context: &Context, json: bool) -> anyhow::Result<()> {
    let provider = context.provider().await?;
    let tables = provider.list_tables().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tables)?);
        return Ok(());
    }

    if tables.is_empty() {
        println!("📭 No tables found ({} driver)", provider.driver());
        return Ok(());
    }

    println!("📋 Tables ({} driver):", provider.driver());
    for table in &tables {
        println!("   • {}", table);
    }
    println!("\n📊 Total: {}", tables.len());

    Ok(())
}

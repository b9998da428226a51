use promptrelay::{ProviderConfig, RetryOptions, RetryingCaller, TextGenerator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Three taglines for a boutique branding studio".to_owned());

    let config = ProviderConfig::from_env()?;
    let generator = TextGenerator::new(
        config.build_provider(),
        RetryingCaller::new(RetryOptions::default()),
    )
    .with_system_instruction("You are a concise brand strategist.");

    let output = generator.generate(&prompt).await?;
    println!("{}", output.into_display_text());

    Ok(())
}

//! Working example against a real Azure OpenAI deployment.
//!
//! Run with:
//! ```bash
//! AZURE_TENANT_ID=... AZURE_CLIENT_ID=... AZURE_CLIENT_SECRET=... \
//! AZURE_ENDPOINT=https://my-resource.openai.azure.com \
//! RUST_LOG=azure_chat=debug cargo run --example working_example
//! ```

use std::collections::HashMap;

use azure_chat::prelude::*;
use tracing_subscriber::EnvFilter;

const CODE_TO_REVIEW: &str = r#"
def calculate_fibonacci(n):
    if n <= 1:
        return n
    return calculate_fibonacci(n-1) + calculate_fibonacci(n-2)
"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Azure OpenAI Client - Working Example");
    println!("{}", "=".repeat(50));

    let client = match create_client_from_env() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Make sure to set the required environment variables:");
            for name in [
                "AZURE_TENANT_ID",
                "AZURE_CLIENT_ID",
                "AZURE_CLIENT_SECRET",
                "AZURE_ENDPOINT",
                "AZURE_DEPLOYMENT_NAME (optional)",
                "AZURE_API_VERSION (optional)",
            ] {
                eprintln!("- {name}");
            }
            return Err(e.into());
        }
    };

    println!("\n=== Example 1: Simple Chat ===");
    let response = client
        .chat(
            "What is the factory pattern in software design?",
            Some("You are a software engineering expert. Provide clear, concise explanations."),
        )
        .await?;
    println!("{response}");

    println!("\n=== Example 2: Code Review with Template ===");
    let variables: HashMap<String, String> = [
        ("language".to_string(), "Python".to_string()),
        ("code".to_string(), CODE_TO_REVIEW.to_string()),
    ]
    .into_iter()
    .collect();
    let response = client
        .chat_with_template(
            "Please review this {language} code for potential improvements:\n\n{code}",
            &variables,
            Some(
                "You are a senior Python developer. Provide constructive feedback on code \
                 quality, performance, and best practices.",
            ),
        )
        .await?;
    println!("{response}");

    println!("\n=== Example 3: Direct Model Access ===");
    let prompt = PromptTemplate::parse("Explain {topic} to a {audience} in simple terms.")?;
    let variables: HashMap<String, String> = [
        ("topic".to_string(), "machine learning".to_string()),
        ("audience".to_string(), "beginner programmer".to_string()),
    ]
    .into_iter()
    .collect();
    let completion = client
        .chat_model()
        .invoke(&[ChatMessage::user(prompt.format(&variables)?)])
        .await?;
    println!("{}", completion.text());
    if let Some(usage) = completion.usage {
        println!("Usage: {} tokens", usage.total_tokens);
    }

    println!("\n{}", "=".repeat(50));
    Ok(())
}

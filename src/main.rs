use fridgechef::{AppConfig, ChatSession, RecipeParser};
use log::{debug, error};
use std::env;
use std::io::Read;

const USAGE: &str = "Usage:
  fridgechef parse [FILE|-]     Parse an assistant reply and print it as JSON
  fridgechef ask <PROMPT...>    Ask the assistant and print the parsed recipe

Environment:
  OPENAI_API_KEY                API key for the assistant
  FRIDGECHEF_USER               User id the cache is written for
  FRIDGECHEF__SECTION__KEY      Override any fridgechef.toml setting";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().ok_or(USAGE)?;
    let config = AppConfig::load()?;
    debug!("{:#?}", config);

    match command.as_str() {
        "parse" => {
            let message = match args.get(1).map(String::as_str) {
                None | Some("-") => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
                Some(path) => tokio::fs::read_to_string(path).await?,
            };
            let recipe = RecipeParser::new(&config.parser).parse(&message);
            println!("{}", serde_json::to_string_pretty(&recipe)?);
        }
        "ask" => {
            let prompt = args[1..].join(" ");
            let mut builder = ChatSession::builder().config(config);
            if let Ok(user) = env::var("FRIDGECHEF_USER") {
                builder = builder.user(user);
            }
            let session = builder.build().await?;

            match session.send(&prompt).await {
                Ok(reply) => {
                    println!("{}", serde_json::to_string_pretty(&reply.recipe)?);
                    session.flush().await;
                }
                Err(e) => {
                    error!("Unable to get a reply: {}", e);
                    return Err(e.into());
                }
            }
        }
        _ => return Err(USAGE.into()),
    }

    Ok(())
}

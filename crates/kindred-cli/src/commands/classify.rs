use anyhow::Result;
use colored::Colorize;
use kindred_core::dialogue::StageRouter;
use kindred_core::session::SessionContext;
use std::path::Path;

pub fn run(text: &str, exchanges: u64, config: Option<&Path>) -> Result<()> {
    let config = super::load_config(config)?;
    let router = StageRouter::from_config(&config.engine);

    let context = SessionContext {
        exchange_count: exchanges,
        ..SessionContext::init()
    };
    let route = router.route(text, &context);

    println!("{}", route.stage.to_string().bright_magenta().bold());
    println!("{}", format!("({})", route.reason).bright_black());
    Ok(())
}

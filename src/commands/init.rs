use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the goals home directory and its `config.json`.
pub async fn init(goals_home: &Path, api_url: &str) -> Result<Out<()>> {
    let config = Config::create(goals_home, api_url).await?;
    Ok(Out::new_message(format!(
        "Created {} pointing at {}",
        config.config_path().display(),
        config.api_url()
    )))
}

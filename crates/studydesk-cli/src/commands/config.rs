//! Config command

use crate::app::{ConfigAction, ConfigArgs};
use anyhow::Result;
use studydesk_core::{Config, StudyDeskError};

pub async fn run(args: ConfigArgs) -> Result<()> {
    let path = Config::path();
    match args.action {
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                return Err(StudyDeskError::InvalidInput(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ))
                .into());
            }
            // Credentials stay in the environment, never in the file
            let written = Config::default().save()?;
            println!("Wrote {}", written.display());
        }
        ConfigAction::Show => {
            let config = Config::load_from(&path)?;
            print!("{}", serde_yaml::to_string(&config)?);
        }
        ConfigAction::Path => println!("{}", path.display()),
    }
    Ok(())
}

use crate::args::HideArgs;
use crate::commands::{persist, session, Out};
use crate::model::ActiveGoal;
use crate::service::Confirmation;
use crate::{Config, Mode, Result};
use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Hides a goal after asking for confirmation, unless `--yes` was given.
pub async fn hide(config: Config, mode: Mode, args: HideArgs) -> Result<Out<ActiveGoal>> {
    let mut service = session(&config, mode).await?;
    let goal = service.find_goal(args.goal())?;

    let confirmation = if args.yes() {
        Confirmation::Confirmed
    } else {
        ask(&format!(
            "Hide '{}'? Its contributions will still count towards the total. [y/N] ",
            goal.label
        ))
        .await?
    };

    let pending = service.hide_goal(&goal, confirmation)?;
    persist(&mut service, pending, &format!("Hiding '{}'", goal.label)).await?;
    Ok(Out::new(format!("Hid goal '{}'", goal.label), goal))
}

/// Asks a yes/no question on stderr and reads the answer from stdin.
async fn ask(question: &str) -> Result<Confirmation> {
    let mut stderr = tokio::io::stderr();
    stderr
        .write_all(question.as_bytes())
        .await
        .context("Unable to write the prompt")?;
    stderr.flush().await.context("Unable to write the prompt")?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await
        .context("Unable to read the answer")?;
    Ok(parse_answer(&answer))
}

fn parse_answer(answer: &str) -> Confirmation {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "si" | "sí").into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("y\n"), Confirmation::Confirmed);
        assert_eq!(parse_answer(" Yes "), Confirmation::Confirmed);
        assert_eq!(parse_answer("sí"), Confirmation::Confirmed);
        assert_eq!(parse_answer("\n"), Confirmation::Declined);
        assert_eq!(parse_answer("nope"), Confirmation::Declined);
    }

    #[tokio::test]
    async fn test_hide_confirmed() {
        let env = TestEnv::new().await;
        let out = hide(env.config(), Mode::Test, HideArgs::new("Viaje", true))
            .await
            .unwrap();
        let goal = out.structure().unwrap();
        assert!(goal.is_orphan);
        assert_eq!(out.message(), "Hid goal 'Viaje'");
    }
}

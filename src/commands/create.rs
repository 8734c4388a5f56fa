use crate::args::CreateArgs;
use crate::commands::{persist, session, Out};
use crate::model::GoalDefinition;
use crate::{Config, Mode, Result};

/// Creates a custom goal and saves the updated custom goal list.
pub async fn create(config: Config, mode: Mode, args: CreateArgs) -> Result<Out<GoalDefinition>> {
    let mut service = session(&config, mode).await?;
    let (goal, pending) = service.create_goal(args.label(), args.target())?;
    persist(&mut service, pending, &format!("Goal '{}'", goal.label)).await?;
    let message = format!("Created goal '{}' with a target of {}", goal.label, goal.target);
    Ok(Out::new(message, goal))
}

use crate::args::TargetArgs;
use crate::commands::{persist, session, Out};
use crate::model::ActiveGoal;
use crate::{Config, Mode, Result};

/// Changes the target of a goal, found by id or label.
pub async fn target(config: Config, mode: Mode, args: TargetArgs) -> Result<Out<ActiveGoal>> {
    let mut service = session(&config, mode).await?;
    let goal = service.find_goal(args.goal())?;
    let pending = service.edit_target(&goal, args.value())?;
    persist(
        &mut service,
        pending,
        &format!("The target of '{}'", goal.label),
    )
    .await?;

    let updated = service.find_goal(goal.identifier())?;
    let message = format!("The target of '{}' is now {}", updated.label, updated.target);
    Ok(Out::new(message, updated))
}

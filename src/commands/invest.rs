use crate::args::InvestArgs;
use crate::commands::{persist, session, Out};
use crate::model::InvestmentRecord;
use crate::{Config, Mode, Result};

/// Records a contribution towards a goal.
pub async fn invest(config: Config, mode: Mode, args: InvestArgs) -> Result<Out<InvestmentRecord>> {
    let mut service = session(&config, mode).await?;
    let (record, pending) =
        service.add_contribution(args.amount(), args.goal(), args.place(), args.date())?;
    persist(&mut service, pending, "The contribution").await?;

    let mut message = format!(
        "Added {} towards '{}' in {}",
        record.total, record.category, record.place
    );
    if let Ok(goal) = service.find_goal(&record.category) {
        if let Some(progress) = goal.progress() {
            message.push_str(&format!(", now at {progress:.1}% of {}", goal.target));
        }
    }
    Ok(Out::new(message, record))
}

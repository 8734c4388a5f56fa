use crate::commands::{session, Out};
use crate::model::{ActiveGoal, GoalStats};
use crate::{Config, Mode, Result};

/// Loads everything and summarizes the grand total and each visible goal.
pub async fn show(config: Config, mode: Mode) -> Result<Out<GoalStats>> {
    let service = session(&config, mode).await?;
    let stats = service.stats();
    Ok(Out::new(summary(&stats), stats))
}

fn summary(stats: &GoalStats) -> String {
    let mut lines = vec![format!("Total invested: {}", stats.grand_total)];
    lines.extend(stats.goals.iter().map(goal_line));
    lines.join("\n")
}

fn goal_line(goal: &ActiveGoal) -> String {
    let label = if goal.label.is_empty() {
        "(no goal)"
    } else {
        &goal.label
    };
    match goal.progress() {
        None => format!("  {label}: {} (no target)", goal.current),
        Some(_) if goal.is_completed() => {
            format!("  {label}: {} of {}, done", goal.current, goal.target)
        }
        Some(progress) => format!(
            "  {label}: {} of {} ({progress:.1}%), {} to go",
            goal.current,
            goal.target,
            goal.remaining()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use crate::test::TestEnv;

    fn goal(label: &str, target: i64, current: i64) -> ActiveGoal {
        ActiveGoal {
            id: None,
            label: label.to_string(),
            target: Amount::from(target),
            current: Amount::from(current),
            is_custom: false,
            is_orphan: target == 0,
        }
    }

    #[test]
    fn test_goal_lines() {
        assert_eq!(
            goal_line(&goal("Anillo", 20000, 3000)),
            "  Anillo: $3,000.00 of $20,000.00 (15.0%), $17,000.00 to go"
        );
        assert_eq!(goal_line(&goal("Viaje", 0, 750)), "  Viaje: $750.00 (no target)");
        assert_eq!(
            goal_line(&goal("Estudios", 7000, 8000)),
            "  Estudios: $8,000.00 of $7,000.00, done"
        );
    }

    #[tokio::test]
    async fn test_show_seeded() {
        let env = TestEnv::new().await;
        let out = show(env.config(), Mode::Test).await.unwrap();
        assert!(out.message().starts_with("Total invested: $13,250.00"));
        assert_eq!(out.structure().unwrap().goals.len(), 6);
    }
}

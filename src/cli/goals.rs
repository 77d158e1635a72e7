use super::ui;
use crate::store::profiles::{ProfileDirectory, UserProfile};
use anyhow::Result;

/// Shows or updates the signed-in profile's spending goals. With no
/// arguments the current goals are printed; otherwise the given fields
/// are written and the result shown.
pub async fn run(
    profiles: &ProfileDirectory,
    profile: Option<UserProfile>,
    monthly: Option<f64>,
    savings: Option<f64>,
    currency: &str,
) -> Result<()> {
    let Some(profile) = profile else {
        anyhow::bail!("Sign in to manage goals: famfin login <username>");
    };

    if monthly.is_none() && savings.is_none() {
        print_goals(&profile, currency);
        return Ok(());
    }

    for goal in [monthly, savings].into_iter().flatten() {
        // Also rejects NaN.
        if !(goal >= 0.0) {
            anyhow::bail!("Goals must be zero or more, got {goal}");
        }
    }

    let updated = profiles
        .update_goals(&profile.uid, monthly, savings)
        .await?
        .ok_or_else(|| anyhow::anyhow!("No profile found for the signed-in user"))?;
    print_goals(&updated, currency);
    Ok(())
}

fn print_goals(profile: &UserProfile, currency: &str) {
    println!(
        "Monthly goal: {}",
        ui::style_text(
            &ui::format_amount(profile.monthly_goal, currency),
            ui::StyleType::TotalValue
        )
    );
    println!(
        "Savings goal: {}",
        ui::style_text(
            &ui::format_amount(profile.savings_goal, currency),
            ui::StyleType::TotalValue
        )
    );
}

use anyhow::Context;
use sqlx::PgPool;
use time::Date;

use super::dto::DailyGoal;

pub async fn find_goal(db: &PgPool, day: Date) -> anyhow::Result<Option<DailyGoal>> {
    let goal = sqlx::query_as::<_, DailyGoal>(
        r#"
        SELECT date, calorie_target, protein_target, water_target_ml
          FROM daily_goals
         WHERE date = $1
        "#,
    )
    .bind(day)
    .fetch_optional(db)
    .await
    .context("find daily goal")?;
    Ok(goal)
}

pub async fn upsert_goal(db: &PgPool, goal: &DailyGoal) -> anyhow::Result<DailyGoal> {
    let goal = sqlx::query_as::<_, DailyGoal>(
        r#"
        INSERT INTO daily_goals (date, calorie_target, protein_target, water_target_ml)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (date) DO UPDATE
           SET calorie_target = EXCLUDED.calorie_target,
               protein_target = EXCLUDED.protein_target,
               water_target_ml = EXCLUDED.water_target_ml
        RETURNING date, calorie_target, protein_target, water_target_ml
        "#,
    )
    .bind(goal.date)
    .bind(goal.calorie_target)
    .bind(goal.protein_target)
    .bind(goal.water_target_ml)
    .fetch_one(db)
    .await
    .context("upsert daily goal")?;
    Ok(goal)
}

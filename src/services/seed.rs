//! First-start data: study catalogue and LVA list.
//!
//! Each table group is only filled when it is empty, so restarts and
//! admin edits are never overwritten.

use sqlx::{PgConnection, PgPool};

use crate::services::catalogue::{SEED_SEMESTER, STUDY_CATEGORIES, STUDY_PROGRAMS, STUDY_UPDATES};
use crate::services::lva;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: u64,
    pub programs: u64,
    pub updates: u64,
    pub lvas: u64,
}

/// Seed study data and LVAs where their tables are empty.
///
/// # Errors
///
/// Returns the first database error; the study seed is rolled back as a
/// whole.
pub async fn seed_if_empty(pool: &PgPool) -> Result<SeedReport, sqlx::Error> {
    let mut report = SeedReport::default();

    let has_categories: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM study_categories)")
        .fetch_one(pool)
        .await?;
    if !has_categories {
        let mut tx = pool.begin().await?;
        seed_study(&mut *tx, &mut report).await?;
        tx.commit().await?;
    }

    let has_lvas: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM lvas)").fetch_one(pool).await?;
    if !has_lvas {
        report.lvas = lva::insert_catalogue(pool).await?;
    }

    if report != SeedReport::default() {
        tracing::info!(
            categories = report.categories,
            programs = report.programs,
            updates = report.updates,
            lvas = report.lvas,
            "seeded initial data"
        );
    }
    Ok(report)
}

async fn seed_study(conn: &mut PgConnection, report: &mut SeedReport) -> Result<(), sqlx::Error> {
    let master_id: Option<i64> = sqlx::query_scalar("SELECT id FROM admins WHERE is_master LIMIT 1")
        .fetch_optional(&mut *conn)
        .await?;

    for &(name, display_name, color, sort_order) in STUDY_CATEGORIES {
        let category_id: i64 = sqlx::query_scalar(
            "INSERT INTO study_categories (name, display_name, color, sort_order)
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(name)
        .bind(display_name)
        .bind(color)
        .bind(sort_order)
        .fetch_one(&mut *conn)
        .await?;
        report.categories += 1;

        let programs = STUDY_PROGRAMS
            .iter()
            .find(|(category, _)| *category == name)
            .map_or(&[][..], |(_, programs)| *programs);
        for (program_order, &program) in (1_i32..).zip(programs) {
            let program_id: i64 = sqlx::query_scalar(
                "INSERT INTO study_programs (category_id, name, sort_order)
                 VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(category_id)
            .bind(program)
            .bind(program_order)
            .fetch_one(&mut *conn)
            .await?;
            report.programs += 1;

            let updates = STUDY_UPDATES
                .iter()
                .find(|(p, _)| *p == program)
                .map_or(&[][..], |(_, updates)| *updates);
            for (update_order, &content) in (1_i32..).zip(updates) {
                sqlx::query(
                    "INSERT INTO study_updates (program_id, content, semester, sort_order, created_by)
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(program_id)
                .bind(content)
                .bind(SEED_SEMESTER)
                .bind(update_order)
                .bind(master_id)
                .execute(&mut *conn)
                .await?;
                report.updates += 1;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "seed_test.rs"]
mod tests;

use sqlx::SqlitePool;
use crate::models::{JobReport, JobRow, JobSummary, Paper, PaperRecord};
use crate::types::{AppError, AppResult, JobStatus};
use chrono::Utc;
use uuid::Uuid;

/// Persistence for jobs and the papers produced by each job.
#[derive(Clone)]
pub struct JobStore {
    pool: SqlitePool,
}

impl JobStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // User operations
    pub async fn ensure_user(&self, user_id: &str) -> AppResult<()> {
        sqlx::query("INSERT OR IGNORE INTO users (user_id, created_at) VALUES (?, ?)")
            .bind(user_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // Job operations
    pub async fn create_job(&self, user_id: &str, goal: &str, plan: &[String]) -> AppResult<String> {
        self.ensure_user(user_id).await?;

        let job_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let plan_json = serde_json::to_string(plan)?;

        sqlx::query(
            r#"
            INSERT INTO jobs (job_id, user_id, goal, plan_json, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&job_id)
        .bind(user_id)
        .bind(goal)
        .bind(plan_json)
        .bind(JobStatus::Pending.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        tracing::debug!(job_id = %job_id, user_id, "Job created");
        Ok(job_id)
    }

    pub async fn add_document(
        &self,
        job_id: &str,
        rank_order: i64,
        title: &str,
        url: &str,
        year: Option<i32>,
        summary: &str,
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let status: Option<String> = sqlx::query_scalar("SELECT status FROM jobs WHERE job_id = ?")
            .bind(job_id)
            .fetch_optional(&mut *tx)
            .await?;
        let next_rank: i64 = sqlx::query_scalar("SELECT COUNT(*) + 1 FROM papers WHERE job_id = ?")
            .bind(job_id)
            .fetch_one(&mut *tx)
            .await?;

        // Papers only attach to pending jobs, in dense rank order.
        let rejection = match status.map(|s| s.parse::<JobStatus>()).transpose()? {
            None => Some(AppError::NotFound(format!("Unknown job_id: {}", job_id))),
            Some(JobStatus::Pending) if rank_order != next_rank => Some(AppError::InvalidRequest(format!(
                "Job {} expects rank_order {}, got {}",
                job_id, next_rank, rank_order
            ))),
            Some(JobStatus::Pending) => None,
            Some(current) => Some(AppError::InvalidRequest(format!(
                "Job {} is already {}",
                job_id, current
            ))),
        };
        if let Some(e) = rejection {
            tx.rollback().await?;
            return Err(e);
        }

        sqlx::query(
            r#"
            INSERT INTO papers (job_id, rank_order, title, url, year, summary)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(job_id)
        .bind(rank_order)
        .bind(title)
        .bind(url)
        .bind(year)
        .bind(summary)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Writes `papers` with ranks 1..N and marks the job completed, in one
    /// transaction. Either everything lands or nothing does.
    pub async fn complete_job(&self, job_id: &str, papers: &[PaperRecord]) -> AppResult<()> {
        if papers.is_empty() {
            return Err(AppError::InvalidRequest(
                "A job cannot complete without papers".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        for (idx, paper) in papers.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO papers (job_id, rank_order, title, url, year, summary, snippet, raw_json)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(job_id)
            .bind(idx as i64 + 1)
            .bind(&paper.title)
            .bind(&paper.url)
            .bind(paper.year)
            .bind(&paper.summary)
            .bind(&paper.snippet)
            .bind(serde_json::to_string(&paper.raw)?)
            .execute(&mut *tx)
            .await?;
        }

        let updated = sqlx::query(
            "UPDATE jobs SET status = ?, updated_at = ? WHERE job_id = ? AND status = ?",
        )
        .bind(JobStatus::Completed.as_str())
        .bind(Utc::now())
        .bind(job_id)
        .bind(JobStatus::Pending.as_str())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(self.transition_error(job_id).await);
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn mark_completed(&self, job_id: &str) -> AppResult<()> {
        if self.count_documents(job_id).await? == 0 {
            return Err(AppError::InvalidRequest(format!(
                "Job {} has no papers and cannot be completed",
                job_id
            )));
        }
        self.set_status(job_id, JobStatus::Completed).await
    }

    pub async fn mark_failed(&self, job_id: &str) -> AppResult<()> {
        self.set_status(job_id, JobStatus::Failed).await
    }

    async fn set_status(&self, job_id: &str, status: JobStatus) -> AppResult<()> {
        let updated = sqlx::query(
            "UPDATE jobs SET status = ?, updated_at = ? WHERE job_id = ? AND status = ?",
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(job_id)
        .bind(JobStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(self.transition_error(job_id).await);
        }

        Ok(())
    }

    /// Explains why a pending-only status update matched no row.
    async fn transition_error(&self, job_id: &str) -> AppError {
        match self.job_status(job_id).await {
            Ok(Some(current)) => AppError::InvalidRequest(format!(
                "Job {} is already {}",
                job_id, current
            )),
            Ok(None) => AppError::NotFound(format!("Unknown job_id: {}", job_id)),
            Err(e) => e,
        }
    }

    pub async fn job_status(&self, job_id: &str) -> AppResult<Option<JobStatus>> {
        let status: Option<String> = sqlx::query_scalar("SELECT status FROM jobs WHERE job_id = ?")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;

        status.map(|s| s.parse()).transpose()
    }

    pub async fn count_documents(&self, job_id: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM papers WHERE job_id = ?")
            .bind(job_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn get_job(&self, job_id: &str) -> AppResult<Option<JobReport>> {
        let job = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT job_id, user_id, goal, plan_json, status, created_at, updated_at
            FROM jobs
            WHERE job_id = ?
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(job) = job else {
            return Ok(None);
        };

        let papers = sqlx::query_as::<_, Paper>(
            r#"
            SELECT rank_order, title, url, year, summary
            FROM papers
            WHERE job_id = ?
            ORDER BY rank_order ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(JobReport {
            status: job.status.parse()?,
            plan: serde_json::from_str(&job.plan_json)?,
            job_id: job.job_id,
            user_id: job.user_id,
            goal: job.goal,
            created_at: job.created_at,
            updated_at: job.updated_at,
            papers,
        }))
    }

    /// A user's jobs, newest first.
    pub async fn list_jobs(&self, user_id: &str) -> AppResult<Vec<JobSummary>> {
        let rows: Vec<(String, String, String, i64, chrono::DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT j.job_id, j.goal, j.status, COUNT(p.id), j.created_at
            FROM jobs j
            LEFT JOIN papers p ON p.job_id = j.job_id
            WHERE j.user_id = ?
            GROUP BY j.job_id
            ORDER BY j.created_at DESC, j.rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(job_id, goal, status, paper_count, created_at)| {
                Ok(JobSummary {
                    job_id,
                    goal,
                    status: status.parse()?,
                    paper_count,
                    created_at,
                })
            })
            .collect()
    }
}

// ABOUTME: Requirement and user story queries for the requirements toolkit
// ABOUTME: Story listing, lookup, approval pipeline grouping and keyword search

use std::collections::BTreeMap;

use super::RequirementsDatabase;
use crate::constants::workflow::STORY_STATUSES;
use crate::errors::AppResult;
use crate::models::requirements::{Requirement, StoryBrief, StorySearchHit, UserStory};

const STORY_COLUMNS: &str = "story_id, program_id, requirement_id, title, user_story, \
     acceptance_criteria, success_metrics, priority, category, category_full, status, version, \
     approved_date, approved_by, created_date, updated_date";

impl RequirementsDatabase {
    /// Insert a requirement
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` when the id is taken
    pub async fn create_requirement(&self, requirement: &Requirement) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO requirements (requirement_id, program_id, title, description, priority, source)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&requirement.requirement_id)
        .bind(&requirement.program_id)
        .bind(&requirement.title)
        .bind(&requirement.description)
        .bind(&requirement.priority)
        .bind(&requirement.source)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert a user story
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` when the id is taken
    pub async fn create_story(&self, story: &UserStory) -> AppResult<()> {
        let sql = format!(
            "INSERT INTO user_stories ({STORY_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)"
        );
        sqlx::query(&sql)
            .bind(&story.story_id)
            .bind(&story.program_id)
            .bind(&story.requirement_id)
            .bind(&story.title)
            .bind(&story.user_story)
            .bind(&story.acceptance_criteria)
            .bind(&story.success_metrics)
            .bind(&story.priority)
            .bind(&story.category)
            .bind(&story.category_full)
            .bind(&story.status)
            .bind(story.version)
            .bind(&story.approved_date)
            .bind(&story.approved_by)
            .bind(&story.created_date)
            .bind(&story.updated_date)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Stories of a program ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_stories(
        &self,
        program_id: &str,
        status: Option<&str>,
        category: Option<&str>,
    ) -> AppResult<Vec<UserStory>> {
        let sql = format!(
            "SELECT {STORY_COLUMNS} FROM user_stories \
             WHERE program_id = $1 \
               AND ($2 IS NULL OR LOWER(status) = LOWER($2)) \
               AND ($3 IS NULL OR LOWER(category) = LOWER($3)) \
             ORDER BY story_id"
        );
        let stories = sqlx::query_as::<_, UserStory>(&sql)
            .bind(program_id)
            .bind(status)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;
        Ok(stories)
    }

    /// Story by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_story(&self, story_id: &str) -> AppResult<Option<UserStory>> {
        let sql = format!("SELECT {STORY_COLUMNS} FROM user_stories WHERE story_id = $1");
        let story = sqlx::query_as::<_, UserStory>(&sql)
            .bind(story_id.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(story)
    }

    /// Stories grouped by workflow status
    ///
    /// Every standard status is present, even when empty; unknown statuses
    /// follow in alphabetical order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_approval_pipeline(
        &self,
        program_id: &str,
    ) -> AppResult<Vec<(String, Vec<StoryBrief>)>> {
        let stories = sqlx::query_as::<_, StoryBrief>(
            r"
            SELECT story_id, COALESCE(title, 'Untitled') AS title, status
            FROM user_stories
            WHERE program_id = $1
            ORDER BY story_id
            ",
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await?;

        let mut pipeline: Vec<(String, Vec<StoryBrief>)> = STORY_STATUSES
            .iter()
            .map(|status| ((*status).to_owned(), Vec::new()))
            .collect();
        let mut unknown: BTreeMap<String, Vec<StoryBrief>> = BTreeMap::new();

        for story in stories {
            match pipeline.iter_mut().find(|(status, _)| *status == story.status) {
                Some((_, bucket)) => bucket.push(story),
                None => unknown.entry(story.status.clone()).or_default().push(story),
            }
        }

        pipeline.extend(unknown);
        Ok(pipeline)
    }

    /// Stories in any program whose title, story text or acceptance criteria
    /// contain `keyword` (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn search_stories_global(&self, keyword: &str) -> AppResult<Vec<StorySearchHit>> {
        let hits = sqlx::query_as::<_, StorySearchHit>(
            r"
            SELECT s.story_id, s.title, s.status, s.priority,
                   p.name AS program_name, p.prefix, c.name AS client_name
            FROM user_stories s
            JOIN programs p ON p.program_id = s.program_id
            JOIN clients c ON c.client_id = p.client_id
            WHERE instr(LOWER(COALESCE(s.title, '')), LOWER($1)) > 0
               OR instr(LOWER(COALESCE(s.user_story, '')), LOWER($1)) > 0
               OR instr(LOWER(COALESCE(s.acceptance_criteria, '')), LOWER($1)) > 0
            ORDER BY c.name, p.prefix, s.story_id
            ",
        )
        .bind(keyword)
        .fetch_all(&self.pool)
        .await?;
        Ok(hits)
    }
}

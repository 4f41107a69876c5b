// ABOUTME: Cross-table reporting queries for the requirements toolkit
// ABOUTME: Requirement coverage, client/program tree, coverage gaps and health score inputs

use sqlx::Row;

use super::{percent, RequirementsDatabase};
use crate::constants::workflow::{APPROVED, FAIL, PASS};
use crate::errors::AppResult;
use crate::models::requirements::{
    ClientNode, CoverageStats, HealthInputs, ProgramTreeEntry, Requirement, UserStory,
};

impl RequirementsDatabase {
    /// Classify each requirement of a program by story and test coverage
    ///
    /// Full: has stories and every story has a test. Partial: has stories,
    /// some without tests. None: no stories.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn requirement_coverage(&self, program_id: &str) -> AppResult<CoverageStats> {
        let rows = sqlx::query(
            r"
            SELECT r.requirement_id,
                   (SELECT COUNT(*) FROM user_stories s
                    WHERE s.requirement_id = r.requirement_id) AS story_count,
                   (SELECT COUNT(*) FROM user_stories s
                    WHERE s.requirement_id = r.requirement_id
                      AND NOT EXISTS (SELECT 1 FROM uat_test_cases t
                                      WHERE t.story_id = s.story_id)) AS untested_count
            FROM requirements r
            WHERE r.program_id = $1
            ",
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await?;

        let mut stats = CoverageStats::default();
        for row in &rows {
            let story_count: i64 = row.get("story_count");
            let untested_count: i64 = row.get("untested_count");
            if story_count == 0 {
                stats.none += 1;
            } else if untested_count == 0 {
                stats.full += 1;
            } else {
                stats.partial += 1;
            }
        }

        let total = rows.len() as i64;
        stats.full_pct = percent(stats.full, total).round();
        stats.partial_pct = percent(stats.partial, total).round();
        stats.none_pct = percent(stats.none, total).round();
        Ok(stats)
    }

    /// Every client with its programs and their story and test counts
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails
    pub async fn get_client_program_tree(&self) -> AppResult<Vec<ClientNode>> {
        let clients = sqlx::query_as::<_, (String, String)>(
            "SELECT client_id, name FROM clients ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut tree = Vec::with_capacity(clients.len());
        for (client_id, name) in clients {
            let programs = sqlx::query_as::<_, ProgramTreeEntry>(
                r"
                SELECT p.prefix, p.name,
                       (SELECT COUNT(*) FROM user_stories s
                        WHERE s.program_id = p.program_id) AS story_count,
                       (SELECT COUNT(*) FROM user_stories s
                        WHERE s.program_id = p.program_id AND s.status = $2) AS approved_count,
                       (SELECT COUNT(*) FROM uat_test_cases t
                        WHERE t.program_id = p.program_id) AS test_count
                FROM programs p
                WHERE p.client_id = $1
                ORDER BY p.name
                ",
            )
            .bind(&client_id)
            .bind(APPROVED)
            .fetch_all(&self.pool)
            .await?;

            tree.push(ClientNode {
                client_id,
                name,
                programs,
            });
        }
        Ok(tree)
    }

    /// Requirements of a program that no story implements
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_orphan_requirements(&self, program_id: &str) -> AppResult<Vec<Requirement>> {
        let requirements = sqlx::query_as::<_, Requirement>(
            r"
            SELECT r.requirement_id, r.program_id, r.title, r.description, r.priority, r.source
            FROM requirements r
            WHERE r.program_id = $1
              AND NOT EXISTS (SELECT 1 FROM user_stories s WHERE s.requirement_id = r.requirement_id)
            ORDER BY r.requirement_id
            ",
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(requirements)
    }

    /// Approved stories of a program without any test case
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_stories_without_tests(&self, program_id: &str) -> AppResult<Vec<UserStory>> {
        let stories = sqlx::query_as::<_, UserStory>(
            r"
            SELECT s.story_id, s.program_id, s.requirement_id, s.title, s.user_story,
                   s.acceptance_criteria, s.success_metrics, s.priority, s.category,
                   s.category_full, s.status, s.version, s.approved_date, s.approved_by,
                   s.created_date, s.updated_date
            FROM user_stories s
            WHERE s.program_id = $1 AND s.status = $2
              AND NOT EXISTS (SELECT 1 FROM uat_test_cases t WHERE t.story_id = s.story_id)
            ORDER BY s.story_id
            ",
        )
        .bind(program_id)
        .bind(APPROVED)
        .fetch_all(&self.pool)
        .await?;
        Ok(stories)
    }

    /// Counts feeding the program health score
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_health_inputs(&self, program_id: &str) -> AppResult<HealthInputs> {
        let row = sqlx::query(
            r"
            SELECT
                (SELECT COUNT(*) FROM user_stories WHERE program_id = $1) AS story_count,
                (SELECT COUNT(*) FROM user_stories
                 WHERE program_id = $1 AND status = $2) AS approved_stories,
                (SELECT COUNT(*) FROM user_stories s
                 WHERE s.program_id = $1
                   AND EXISTS (SELECT 1 FROM uat_test_cases t WHERE t.story_id = s.story_id))
                    AS stories_with_tests,
                (SELECT COUNT(*) FROM uat_test_cases WHERE program_id = $1) AS test_count,
                (SELECT COUNT(*) FROM uat_test_cases
                 WHERE program_id = $1 AND test_status IN ($3, $4)) AS executed_tests,
                (SELECT COUNT(*) FROM uat_test_cases
                 WHERE program_id = $1 AND test_status = $3) AS passed_tests,
                (SELECT COUNT(*) FROM requirements WHERE program_id = $1) AS requirement_count,
                (SELECT COUNT(*) FROM requirements r
                 WHERE r.program_id = $1
                   AND EXISTS (SELECT 1 FROM user_stories s WHERE s.requirement_id = r.requirement_id))
                    AS covered_requirements
            ",
        )
        .bind(program_id)
        .bind(APPROVED)
        .bind(PASS)
        .bind(FAIL)
        .fetch_one(&self.pool)
        .await?;

        Ok(HealthInputs {
            story_count: row.get("story_count"),
            approved_stories: row.get("approved_stories"),
            stories_with_tests: row.get("stories_with_tests"),
            test_count: row.get("test_count"),
            executed_tests: row.get("executed_tests"),
            passed_tests: row.get("passed_tests"),
            requirement_count: row.get("requirement_count"),
            covered_requirements: row.get("covered_requirements"),
        })
    }
}

// ABOUTME: UAT test case queries for the requirements toolkit
// ABOUTME: Test listing with filters and the execution summary with pass rates

use std::collections::BTreeMap;

use super::{order_by_workflow, percent, RequirementsDatabase};
use crate::constants::workflow::{FAIL, PASS, TEST_STATUSES};
use crate::errors::AppResult;
use crate::models::requirements::{TestCase, TestExecutionSummary, TestTypeBreakdown};

const TEST_COLUMNS: &str = "test_id, program_id, story_id, title, test_type, test_status, \
     test_steps, expected_results, tested_by, tested_date";

impl RequirementsDatabase {
    /// Insert a test case
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` when the id is taken
    pub async fn create_test_case(&self, test: &TestCase) -> AppResult<()> {
        let sql = format!(
            "INSERT INTO uat_test_cases ({TEST_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        );
        sqlx::query(&sql)
            .bind(&test.test_id)
            .bind(&test.program_id)
            .bind(&test.story_id)
            .bind(&test.title)
            .bind(&test.test_type)
            .bind(&test.test_status)
            .bind(&test.test_steps)
            .bind(&test.expected_results)
            .bind(&test.tested_by)
            .bind(&test.tested_date)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Test cases of a program ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_test_cases(
        &self,
        program_id: &str,
        status: Option<&str>,
        test_type: Option<&str>,
    ) -> AppResult<Vec<TestCase>> {
        let sql = format!(
            "SELECT {TEST_COLUMNS} FROM uat_test_cases \
             WHERE program_id = $1 \
               AND ($2 IS NULL OR LOWER(test_status) = LOWER($2)) \
               AND ($3 IS NULL OR LOWER(test_type) = LOWER($3)) \
             ORDER BY test_id"
        );
        let tests = sqlx::query_as::<_, TestCase>(&sql)
            .bind(program_id)
            .bind(status)
            .bind(test_type)
            .fetch_all(&self.pool)
            .await?;
        Ok(tests)
    }

    /// Execution and pass rates with per-status and per-type breakdowns
    ///
    /// Executed tests are those that ran to `Pass` or `Fail`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_test_execution_summary(
        &self,
        program_id: &str,
    ) -> AppResult<TestExecutionSummary> {
        let rows = sqlx::query_as::<_, (Option<String>, String, i64)>(
            r"
            SELECT test_type, test_status, COUNT(*)
            FROM uat_test_cases
            WHERE program_id = $1
            GROUP BY test_type, test_status
            ",
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_status: BTreeMap<String, i64> = TEST_STATUSES
            .iter()
            .map(|status| ((*status).to_owned(), 0))
            .collect();
        let mut by_type: BTreeMap<String, TestTypeBreakdown> = BTreeMap::new();

        for (test_type, status, count) in rows {
            *by_status.entry(status.clone()).or_default() += count;

            let test_type = test_type.unwrap_or_else(|| "unspecified".to_owned());
            let breakdown = by_type
                .entry(test_type.clone())
                .or_insert_with(|| TestTypeBreakdown {
                    test_type,
                    total: 0,
                    passed: 0,
                    failed: 0,
                });
            breakdown.total += count;
            if status == PASS {
                breakdown.passed += count;
            } else if status == FAIL {
                breakdown.failed += count;
            }
        }

        let total: i64 = by_status.values().sum();
        let passed = by_status.get(PASS).copied().unwrap_or(0);
        let failed = by_status.get(FAIL).copied().unwrap_or(0);
        let executed = passed + failed;

        Ok(TestExecutionSummary {
            total,
            executed,
            passed,
            execution_rate: round_one_decimal(percent(executed, total)),
            pass_rate: round_one_decimal(percent(passed, executed)),
            by_status: order_by_workflow(by_status.into_iter().collect(), &TEST_STATUSES),
            by_type: by_type.into_values().collect(),
        })
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_one_decimal() {
        assert!((round_one_decimal(66.666) - 66.7).abs() < f64::EPSILON);
        assert!((round_one_decimal(50.0) - 50.0).abs() < f64::EPSILON);
    }
}

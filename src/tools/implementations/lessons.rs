// list_lessons - lessons taught, newest first

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::db::{Filter, OrderDirection, SupabaseClient};
use crate::tools::registry::Tool;

/// Lessons are capped tighter than the general read limit.
const LESSON_LIMIT: usize = 50;

pub struct ListLessonsTool {
    db: SupabaseClient,
}

impl ListLessonsTool {
    pub fn new(db: SupabaseClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for ListLessonsTool {
    fn name(&self) -> &str {
        "list_lessons"
    }

    fn description(&self) -> &str {
        "Busca informações sobre aulas realizadas."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "class_name": {
                    "type": "string",
                    "description": "Nome da turma"
                },
                "start_date": {
                    "type": "string",
                    "description": "Data inicial no formato YYYY-MM-DD"
                },
                "end_date": {
                    "type": "string",
                    "description": "Data final no formato YYYY-MM-DD"
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let mut query = self
            .db
            .table("aulas")
            .select("*, turma:turmas(nome, idioma)");

        if let Some(class_name) = args["class_name"].as_str() {
            let classes = self
                .db
                .table("turmas")
                .select("id")
                .filter("nome", Filter::contains(class_name))
                .fetch()
                .await;
            if let Some(class) = classes.first() {
                query = query.filter("turma_id", Filter::Eq(class["id"].clone()));
            }
        }

        if let Some(start_date) = args["start_date"].as_str() {
            query = query.filter("data", Filter::Gte(json!(start_date)));
        }
        if let Some(end_date) = args["end_date"].as_str() {
            query = query.filter("data", Filter::Lte(json!(end_date)));
        }

        let lessons = query
            .order("data", OrderDirection::Descending)
            .limit(LESSON_LIMIT)
            .fetch()
            .await;

        Ok(Value::Array(lessons))
    }
}

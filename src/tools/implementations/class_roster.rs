// list_students_in_class - roster of one class

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::db::{Filter, SupabaseClient};
use crate::tools::registry::Tool;

pub struct ListStudentsInClassTool {
    db: SupabaseClient,
}

impl ListStudentsInClassTool {
    pub fn new(db: SupabaseClient) -> Self {
        Self { db }
    }

    /// Resolve the class record by id when given, else by first name match.
    async fn resolve_class(&self, args: &Value) -> Result<Result<Value, Value>> {
        if let Some(class_id) = args["class_id"].as_str() {
            let mut rows = self
                .db
                .table("turmas")
                .filter("id", Filter::eq(class_id))
                .try_fetch()
                .await?;
            return Ok(match rows.drain(..).next() {
                Some(class) => Ok(class),
                None => Err(json!({ "error": "class not found" })),
            });
        }

        if let Some(class_name) = args["class_name"].as_str() {
            let mut rows = self
                .db
                .table("turmas")
                .filter("nome", Filter::contains(class_name))
                .try_fetch()
                .await?;
            return Ok(match rows.drain(..).next() {
                Some(class) => Ok(class),
                None => Err(json!({
                    "error": format!("class not found: '{}'", class_name)
                })),
            });
        }

        Ok(Err(json!({ "error": "provide class name or id" })))
    }
}

#[async_trait]
impl Tool for ListStudentsInClassTool {
    fn name(&self) -> &str {
        "list_students_in_class"
    }

    fn description(&self) -> &str {
        "Lista todos os alunos matriculados em uma turma específica."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "class_name": {
                    "type": "string",
                    "description": "Nome ou parte do nome da turma"
                },
                "class_id": {
                    "type": "string",
                    "description": "ID da turma (UUID)"
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let class = match self.resolve_class(&args).await? {
            Ok(class) => class,
            Err(payload) => return Ok(payload),
        };

        let enrollments = self
            .db
            .table("matriculas")
            .select("*, aluno:alunos(*)")
            .filter("turma_id", Filter::Eq(class["id"].clone()))
            .filter("status", Filter::eq("ativo"))
            .fetch()
            .await;

        let students: Vec<Value> = enrollments
            .into_iter()
            .filter_map(|mut enrollment| {
                let student = enrollment["aluno"].take();
                (!student.is_null()).then_some(student)
            })
            .collect();

        Ok(json!({
            "turma": class,
            "total_alunos": students.len(),
            "alunos": students,
        }))
    }
}

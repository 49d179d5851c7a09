// list_classes_for_student - every class one student is enrolled in

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::db::{Filter, SupabaseClient};
use crate::tools::registry::Tool;

pub struct ListClassesForStudentTool {
    db: SupabaseClient,
}

impl ListClassesForStudentTool {
    pub fn new(db: SupabaseClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for ListClassesForStudentTool {
    fn name(&self) -> &str {
        "list_classes_for_student"
    }

    fn description(&self) -> &str {
        "Lista todas as turmas em que um aluno está matriculado."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "student_name": {
                    "type": "string",
                    "description": "Nome ou parte do nome do aluno"
                }
            },
            "required": ["student_name"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let Some(student_name) = args["student_name"].as_str() else {
            return Ok(json!({ "error": "provide student name" }));
        };

        let mut matches = self
            .db
            .table("alunos")
            .filter("nome", Filter::contains(student_name))
            .try_fetch()
            .await?;

        let Some(student) = matches.drain(..).next() else {
            return Ok(json!({
                "error": format!("student not found: '{}'", student_name)
            }));
        };

        let enrollments = self
            .db
            .table("matriculas")
            .select("*, turma:turmas(*, professor:usuarios!turmas_professor_id_fkey(nome))")
            .filter("aluno_id", Filter::Eq(student["id"].clone()))
            .filter("status", Filter::eq("ativo"))
            .fetch()
            .await;

        let classes: Vec<Value> = enrollments
            .into_iter()
            .filter_map(|mut enrollment| {
                let class = enrollment["turma"].take();
                (!class.is_null()).then_some(class)
            })
            .collect();

        Ok(json!({
            "aluno": student,
            "total_turmas": classes.len(),
            "turmas": classes,
        }))
    }
}

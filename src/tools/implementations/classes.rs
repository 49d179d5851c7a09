// list_classes - class catalog lookup

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::db::{Filter, SupabaseClient};
use crate::tools::registry::Tool;

/// Projection embedding the responsible teacher on each class row.
const CLASS_WITH_TEACHER: &str = "*, professor:usuarios!turmas_professor_id_fkey(id, nome, email)";

pub struct ListClassesTool {
    db: SupabaseClient,
}

impl ListClassesTool {
    pub fn new(db: SupabaseClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for ListClassesTool {
    fn name(&self) -> &str {
        "list_classes"
    }

    fn description(&self) -> &str {
        "Busca informações sobre turmas. Use para perguntas sobre turmas, idiomas, \
         horários, professores de turmas."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "language": {
                    "type": "string",
                    "description": "Filtrar por idioma: 'Inglês', 'Espanhol', 'Francês'"
                },
                "teacher_name": {
                    "type": "string",
                    "description": "Nome ou parte do nome do professor"
                },
                "class_name": {
                    "type": "string",
                    "description": "Nome ou parte do nome da turma"
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let mut query = self.db.table("turmas").select(CLASS_WITH_TEACHER);

        if let Some(language) = args["language"].as_str() {
            query = query.filter("idioma", Filter::eq(language));
        }
        if let Some(class_name) = args["class_name"].as_str() {
            query = query.filter("nome", Filter::contains(class_name));
        }

        let mut classes = query.fetch().await;

        // Teacher is a joined attribute, so that filter runs after retrieval.
        if let Some(teacher_name) = args["teacher_name"].as_str() {
            let needle = teacher_name.to_lowercase();
            classes.retain(|class| {
                class["professor"]["nome"]
                    .as_str()
                    .map(|nome| nome.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            });
        }

        for class in &mut classes {
            let total = self
                .db
                .table("matriculas")
                .filter("turma_id", Filter::Eq(class["id"].clone()))
                .filter("status", Filter::eq("ativo"))
                .count()
                .await;
            class["total_alunos"] = json!(total);
        }

        Ok(Value::Array(classes))
    }
}

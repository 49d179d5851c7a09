// list_teachers - active teachers and the classes they teach

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::db::{Filter, SupabaseClient};
use crate::tools::registry::Tool;

pub struct ListTeachersTool {
    db: SupabaseClient,
}

impl ListTeachersTool {
    pub fn new(db: SupabaseClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for ListTeachersTool {
    fn name(&self) -> &str {
        "list_teachers"
    }

    fn description(&self) -> &str {
        "Lista professores e suas turmas."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Nome ou parte do nome do professor"
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let mut query = self
            .db
            .table("usuarios")
            .filter("perfil", Filter::eq("professor"))
            .filter("ativo", Filter::Eq(json!(true)));

        if let Some(name) = args["name"].as_str() {
            query = query.filter("nome", Filter::contains(name));
        }

        let mut teachers = query.fetch().await;

        for teacher in &mut teachers {
            let classes = self
                .db
                .table("turmas")
                .select("id, nome, idioma, horario")
                .filter("professor_id", Filter::Eq(teacher["id"].clone()))
                .fetch()
                .await;
            teacher["total_turmas"] = json!(classes.len());
            teacher["turmas"] = Value::Array(classes);
        }

        Ok(Value::Array(teachers))
    }
}

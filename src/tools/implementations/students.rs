// list_students - student lookup with status filters

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::db::{Filter, OrderDirection, SupabaseClient};
use crate::tools::registry::Tool;

pub struct ListStudentsTool {
    db: SupabaseClient,
}

impl ListStudentsTool {
    pub fn new(db: SupabaseClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for ListStudentsTool {
    fn name(&self) -> &str {
        "list_students"
    }

    fn description(&self) -> &str {
        "Busca informações sobre alunos. Use para perguntas sobre alunos específicos, \
         status financeiro, inadimplentes, etc."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Nome ou parte do nome do aluno"
                },
                "financial_status": {
                    "type": "string",
                    "enum": ["em_dia", "pendente", "inadimplente"],
                    "description": "Filtrar por status financeiro"
                },
                "pedagogical_status": {
                    "type": "string",
                    "enum": ["ativo", "trancado", "concluido"],
                    "description": "Filtrar por status pedagógico"
                },
                "uses_transport": {
                    "type": "boolean",
                    "description": "Filtrar por uso de transporte"
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let mut query = self.db.table("alunos");

        if let Some(name) = args["name"].as_str() {
            query = query.filter("nome", Filter::contains(name));
        }
        if let Some(status) = args["financial_status"].as_str() {
            query = query.filter("status_financeiro", Filter::eq(status));
        }
        if let Some(status) = args["pedagogical_status"].as_str() {
            query = query.filter("status_pedagogico", Filter::eq(status));
        }
        if let Some(uses_transport) = args["uses_transport"].as_bool() {
            query = query.filter("usa_transporte", Filter::Eq(json!(uses_transport)));
        }

        let students = query.order("nome", OrderDirection::Ascending).fetch().await;
        Ok(Value::Array(students))
    }
}

// aggregate_statistics - fixed bundle of school-wide counts
//
// Each figure is an independent exact-count query; a failing sub-count
// degrades to zero without failing the bundle.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::db::{Filter, SupabaseClient};
use crate::tools::registry::Tool;

pub struct AggregateStatisticsTool {
    db: SupabaseClient,
}

impl AggregateStatisticsTool {
    pub fn new(db: SupabaseClient) -> Self {
        Self { db }
    }

    async fn count_students(&self, column: &str, value: &str) -> u64 {
        self.db
            .table("alunos")
            .filter(column, Filter::eq(value))
            .count()
            .await
    }

    async fn count_classes_by_language(&self, language: &str) -> u64 {
        self.db
            .table("turmas")
            .filter("idioma", Filter::eq(language))
            .count()
            .await
    }
}

#[async_trait]
impl Tool for AggregateStatisticsTool {
    fn name(&self) -> &str {
        "aggregate_statistics"
    }

    fn description(&self) -> &str {
        "Retorna estatísticas gerais da escola: total de turmas, alunos, professores, \
         inadimplentes, etc."
    }

    fn parameters(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        let total_turmas = self.db.table("turmas").count().await;
        let total_alunos = self.db.table("alunos").count().await;

        let alunos_ativos = self.count_students("status_pedagogico", "ativo").await;
        let alunos_trancados = self.count_students("status_pedagogico", "trancado").await;

        let alunos_em_dia = self.count_students("status_financeiro", "em_dia").await;
        let alunos_pendentes = self.count_students("status_financeiro", "pendente").await;
        let alunos_inadimplentes = self.count_students("status_financeiro", "inadimplente").await;

        let total_professores = self
            .db
            .table("usuarios")
            .filter("perfil", Filter::eq("professor"))
            .filter("ativo", Filter::Eq(json!(true)))
            .count()
            .await;

        let turmas_ingles = self.count_classes_by_language("Inglês").await;
        let turmas_espanhol = self.count_classes_by_language("Espanhol").await;
        let turmas_frances = self.count_classes_by_language("Francês").await;

        let alunos_transporte = self
            .db
            .table("alunos")
            .filter("usa_transporte", Filter::Eq(json!(true)))
            .count()
            .await;

        Ok(json!({
            "total_turmas": total_turmas,
            "total_alunos": total_alunos,
            "alunos_ativos": alunos_ativos,
            "alunos_trancados": alunos_trancados,
            "alunos_em_dia": alunos_em_dia,
            "alunos_pendentes": alunos_pendentes,
            "alunos_inadimplentes": alunos_inadimplentes,
            "total_professores": total_professores,
            "turmas_ingles": turmas_ingles,
            "turmas_espanhol": turmas_espanhol,
            "turmas_frances": turmas_frances,
            "alunos_transporte": alunos_transporte,
        }))
    }
}

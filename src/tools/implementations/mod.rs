// Tool implementations
//
// The nine read operations the model may call, one file each. All are pure
// reads over the query gateway; none of them mutates the store.

pub mod attendance;
pub mod birthdays;
pub mod class_roster;
pub mod classes;
pub mod lessons;
pub mod statistics;
pub mod student_classes;
pub mod students;
pub mod teachers;

// Re-exports for convenience
pub use attendance::ListAttendanceTool;
pub use birthdays::ListBirthdaysTool;
pub use class_roster::ListStudentsInClassTool;
pub use classes::ListClassesTool;
pub use lessons::ListLessonsTool;
pub use statistics::AggregateStatisticsTool;
pub use student_classes::ListClassesForStudentTool;
pub use students::ListStudentsTool;
pub use teachers::ListTeachersTool;

use crate::db::SupabaseClient;
use crate::tools::registry::ToolRegistry;

/// Build the full tool catalog against one store client.
pub fn build_registry(db: &SupabaseClient) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(ListClassesTool::new(db.clone())));
    registry.register(Box::new(ListStudentsTool::new(db.clone())));
    registry.register(Box::new(ListStudentsInClassTool::new(db.clone())));
    registry.register(Box::new(ListClassesForStudentTool::new(db.clone())));
    registry.register(Box::new(ListAttendanceTool::new(db.clone())));
    registry.register(Box::new(ListLessonsTool::new(db.clone())));
    registry.register(Box::new(ListTeachersTool::new(db.clone())));
    registry.register(Box::new(AggregateStatisticsTool::new(db.clone())));
    registry.register(Box::new(ListBirthdaysTool::new(db.clone())));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_holds_all_nine_tools() {
        let db = SupabaseClient::new("http://localhost:54321", "test-key").unwrap();
        let registry = build_registry(&db);

        assert_eq!(registry.len(), 9);
        for name in [
            "list_classes",
            "list_students",
            "list_students_in_class",
            "list_classes_for_student",
            "list_attendance",
            "list_lessons",
            "list_teachers",
            "aggregate_statistics",
            "list_birthdays",
        ] {
            assert!(registry.has_tool(name), "missing tool: {}", name);
        }
    }
}

use quarry_core::{Dialect, ExprRef};

use crate::{
    Argument, Branch, CompiledQuery, GenStatement, QueryBody, ResolvedAccess, SeparatorGuard,
};

fn value_arg(expr: u32, var: &str) -> Argument {
    Argument::Value {
        expr: ExprRef(expr),
        access: ResolvedAccess::direct(var),
    }
}

fn dynamic(statements: Vec<GenStatement>) -> CompiledQuery {
    CompiledQuery {
        function_name: "update_card".to_string(),
        dialect: Dialect::Postgres,
        bindings: Vec::new(),
        body: QueryBody::Dynamic { statements },
        needs_row_lock_clause: false,
        fallback_guard: None,
    }
}

#[test]
fn arguments_in_statement_order() {
    let query = dynamic(vec![
        GenStatement::AppendFragment("UPDATE cards SET updated_at = ?".to_string()),
        GenStatement::AppendArg(Argument::System {
            field: "updated_at".to_string(),
        }),
        GenStatement::If {
            branches: vec![Branch {
                cond_var: "cond0".to_string(),
                access: ResolvedAccess::direct("title"),
                body: vec![
                    GenStatement::AppendFragment(", title = ?".to_string()),
                    GenStatement::AppendArg(value_arg(0, "title")),
                ],
            }],
            otherwise: Some(vec![GenStatement::AppendSeparator {
                token: ",".to_string(),
                guard: SeparatorGuard::BoundaryNeeded("boundary_needed".to_string()),
            }]),
        },
        GenStatement::Loop {
            collection_var: "collection1".to_string(),
            access: ResolvedAccess::direct("ids"),
            item_var: "id_0".to_string(),
            is_last_var: None,
            body: vec![GenStatement::AppendArg(value_arg(1, "id_0"))],
        },
    ]);

    assert_eq!(query.arguments().len(), 3);
    assert_eq!(
        query.argument_system_fields(),
        vec![Some("updated_at"), None, None]
    );
    assert!(query.has_system_arguments());
    assert!(!query.is_static());
}

#[test]
fn static_arguments() {
    let query = CompiledQuery {
        function_name: "get_card".to_string(),
        dialect: Dialect::Sqlite,
        bindings: Vec::new(),
        body: QueryBody::Static {
            text: "SELECT * FROM cards WHERE id = ?".to_string(),
            arguments: vec![value_arg(0, "id")],
        },
        needs_row_lock_clause: false,
        fallback_guard: None,
    };

    assert!(query.is_static());
    assert!(!query.has_system_arguments());
    assert_eq!(query.argument_system_fields(), vec![None]);
}

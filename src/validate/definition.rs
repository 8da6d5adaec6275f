//! Structural checks on a parsed plugin definition
//!
//! Everything here is static: executor shape, step bindings, template
//! references, and response-mapping syntax. Filesystem concerns (icon,
//! test coverage) live in their own modules.

use std::collections::BTreeSet;

use crate::domain::{scan_refs, ActionDef, ExecutorSlots, MappingExpr, PluginDef};

use super::violation::Violation;

/// Checks a definition against its folder name
pub fn check_definition(def: &PluginDef, folder_id: &str) -> Vec<Violation> {
    let mut violations = Vec::new();

    if def.id != folder_id {
        violations.push(Violation::IdMismatch {
            folder: folder_id.to_string(),
            declared: def.id.clone(),
        });
    }

    if def.tags.is_empty() {
        violations.push(Violation::EmptyTags);
    }

    for tool in def.duplicate_tool_names() {
        violations.push(Violation::DuplicateTool { tool });
    }

    for (name, action) in def.tools() {
        check_tool(def, name, action, &mut violations);
    }

    violations
}

fn check_tool(def: &PluginDef, name: &str, action: &ActionDef, violations: &mut Vec<Violation>) {
    match &action.steps {
        Some(steps) => {
            if !action.exec.is_empty() {
                violations.push(Violation::StepsAndExecutor {
                    tool: name.to_string(),
                });
            }
            if steps.is_empty() {
                violations.push(Violation::EmptySteps {
                    tool: name.to_string(),
                });
            }

            let mut bindings: BTreeSet<&str> = BTreeSet::new();
            for step in steps {
                check_slots(def, name, action, &step.exec, &bindings, violations);
                if let Some(bind) = &step.bind {
                    bindings.insert(bind.as_str());
                }
            }
        }
        None => {
            let bindings = BTreeSet::new();
            check_slots(def, name, action, &action.exec, &bindings, violations);
        }
    }
}

fn check_slots(
    def: &PluginDef,
    name: &str,
    action: &ActionDef,
    slots: &ExecutorSlots,
    bindings: &BTreeSet<&str>,
    violations: &mut Vec<Violation>,
) {
    let kinds = slots.kinds();
    match kinds.len() {
        0 => violations.push(Violation::NoExecutor {
            tool: name.to_string(),
        }),
        1 => {}
        _ => violations.push(Violation::MultipleExecutors {
            tool: name.to_string(),
            kinds: kinds
                .iter()
                .map(|k| k.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }

    for text in slots.template_strings() {
        for tref in scan_refs(text) {
            check_ref(def, name, action, &tref.parts, &tref.raw, bindings, violations);
        }
    }

    if let Some(response) = slots.response() {
        for (field, expr) in &response.mapping {
            if let Err(e) = expr.parse::<MappingExpr>() {
                violations.push(Violation::BadMapping {
                    tool: name.to_string(),
                    field: field.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
}

fn check_ref(
    def: &PluginDef,
    name: &str,
    action: &ActionDef,
    parts: &[String],
    raw: &str,
    bindings: &BTreeSet<&str>,
    violations: &mut Vec<Violation>,
) {
    let root = parts.first().map(String::as_str).unwrap_or("");
    let key = parts.get(1).map(String::as_str);

    match root {
        "params" => {
            let Some(param) = key else {
                violations.push(Violation::UnknownParam {
                    tool: name.to_string(),
                    param: raw.to_string(),
                });
                return;
            };
            if !action.params.contains_key(param) {
                violations.push(Violation::UnknownParam {
                    tool: name.to_string(),
                    param: param.to_string(),
                });
            }
        }
        "auth" => {
            if def.auth.is_none() {
                violations.push(Violation::AuthRefWithoutAuth {
                    tool: name.to_string(),
                });
            }
        }
        "settings" => {
            let Some(setting) = key else {
                violations.push(Violation::UnknownSetting {
                    tool: name.to_string(),
                    setting: raw.to_string(),
                });
                return;
            };
            if !def.settings.contains_key(setting) {
                violations.push(Violation::UnknownSetting {
                    tool: name.to_string(),
                    setting: setting.to_string(),
                });
            }
        }
        step => {
            if !bindings.contains(step) {
                violations.push(Violation::UnknownStepBinding {
                    tool: name.to_string(),
                    reference: raw.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> PluginDef {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn valid_definition_passes() {
        let def = parse(
            r#"
id: demo
name: Demo
description: d
tags: [demo]
actions:
  item.list:
    readonly: true
    rest:
      url: https://example.com/items
      response:
        mapping:
          id: "$[].id"
"#,
        );
        assert!(check_definition(&def, "demo").is_empty());
    }

    #[test]
    fn id_mismatch_is_reported() {
        let def = parse("id: demo\nname: D\ndescription: d\ntags: [x]\n");
        let violations = check_definition(&def, "other");
        assert!(violations.contains(&Violation::IdMismatch {
            folder: "other".to_string(),
            declared: "demo".to_string(),
        }));
    }

    #[test]
    fn empty_tags_is_reported() {
        let def = parse("id: demo\nname: D\ndescription: d\ntags: []\n");
        assert!(check_definition(&def, "demo").contains(&Violation::EmptyTags));
    }

    #[test]
    fn missing_executor_is_reported() {
        let def = parse(
            "id: demo\nname: D\ndescription: d\ntags: [x]\nactions:\n  noop: {}\n",
        );
        let violations = check_definition(&def, "demo");
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::NoExecutor { tool } if tool == "noop")));
    }

    #[test]
    fn multiple_executors_are_reported() {
        let def = parse(
            r#"
id: demo
name: D
description: d
tags: [x]
actions:
  both:
    rest:
      url: https://example.com
    sql:
      query: SELECT 1
"#,
        );
        let violations = check_definition(&def, "demo");
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::MultipleExecutors { tool, .. } if tool == "both")));
    }

    #[test]
    fn undeclared_param_reference_is_reported() {
        let def = parse(
            r#"
id: demo
name: D
description: d
tags: [x]
actions:
  item.get:
    params:
      id:
        type: string
    rest:
      url: https://example.com/items/{{params.item_id}}
"#,
        );
        let violations = check_definition(&def, "demo");
        assert!(violations.contains(&Violation::UnknownParam {
            tool: "item.get".to_string(),
            param: "item_id".to_string(),
        }));
    }

    #[test]
    fn auth_ref_without_auth_block() {
        let def = parse(
            r#"
id: demo
name: D
description: d
tags: [x]
actions:
  whoami:
    rest:
      url: https://example.com/me?token={{auth.token}}
"#,
        );
        let violations = check_definition(&def, "demo");
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::AuthRefWithoutAuth { .. })));
    }

    #[test]
    fn step_bindings_must_be_prior() {
        let def = parse(
            r#"
id: demo
name: D
description: d
tags: [x]
actions:
  chain:
    steps:
      - rest:
          url: https://example.com/a/{{second.id}}
        as: first
      - rest:
          url: https://example.com/b/{{first.id}}
        as: second
"#,
        );
        let violations = check_definition(&def, "demo");
        // Forward reference to `second` is invalid, backward to `first` is fine
        assert_eq!(
            violations,
            vec![Violation::UnknownStepBinding {
                tool: "chain".to_string(),
                reference: "second.id".to_string(),
            }]
        );
    }

    #[test]
    fn bad_mapping_is_reported() {
        let def = parse(
            r#"
id: demo
name: D
description: d
tags: [x]
actions:
  item.list:
    rest:
      url: https://example.com
      response:
        mapping:
          count: "data.count|to_uppercase"
"#,
        );
        let violations = check_definition(&def, "demo");
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::BadMapping { field, .. } if field == "count")));
    }
}

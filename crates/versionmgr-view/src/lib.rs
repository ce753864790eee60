//! Plain, serializable projections of inventory rows.
//!
//! Every view declares a type tag. [`encode`] writes the tag next to the
//! view's fields and [`decode`] refuses input whose tag belongs to another
//! view, so a payload can't be read back as the wrong entity.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

mod report;
mod views;

pub use report::{PreviousVersion, ReportRequest, ReportResponse};
pub use views::*;

/// Key holding the type tag in an encoded view.
pub const TYPE_KEY: &str = "type";

pub trait View: Serialize + DeserializeOwned {
    const KIND: &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("expected a `{expected}` view, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("encoded view must be a json object")]
    NotAnObject,

    #[error("view json: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn encode<V: View>(view: &V) -> Result<Value, ViewError> {
    let fields = match serde_json::to_value(view)? {
        Value::Object(fields) => fields,
        _ => return Err(ViewError::NotAnObject),
    };

    let mut out = Map::with_capacity(fields.len() + 1);
    out.insert(TYPE_KEY.to_string(), Value::String(V::KIND.to_string()));
    out.extend(fields);
    Ok(Value::Object(out))
}

pub fn decode<V: View>(value: Value) -> Result<V, ViewError> {
    let Value::Object(mut fields) = value else {
        return Err(ViewError::NotAnObject);
    };

    match fields.remove(TYPE_KEY) {
        Some(Value::String(kind)) if kind == V::KIND => {}
        Some(Value::String(kind)) => {
            return Err(ViewError::TypeMismatch {
                expected: V::KIND,
                found: kind,
            });
        }
        Some(other) => {
            return Err(ViewError::TypeMismatch {
                expected: V::KIND,
                found: other.to_string(),
            });
        }
        None => {
            return Err(ViewError::TypeMismatch {
                expected: V::KIND,
                found: "<missing>".to_string(),
            });
        }
    }

    Ok(serde_json::from_value(Value::Object(fields))?)
}

pub fn encode_list<V: View>(views: &[V]) -> Result<Value, ViewError> {
    views
        .iter()
        .map(encode)
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

pub fn decode_list<V: View>(value: Value) -> Result<Vec<V>, ViewError> {
    match value {
        Value::Array(items) => items.into_iter().map(decode).collect(),
        _ => Err(ViewError::NotAnObject),
    }
}

pub fn to_json<V: View>(view: &V) -> Result<String, ViewError> {
    Ok(serde_json::to_string(&encode(view)?)?)
}

pub fn from_json<V: View>(raw: &str) -> Result<V, ViewError> {
    decode(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute(id: i32, name: &str, value: &str) -> AttributeView {
        AttributeView {
            id,
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    fn cluster() -> ClusterView {
        ClusterView {
            id: 7,
            name: "Abigail".to_string(),
            attributes: vec![attribute(1, "dc", "fra1"), attribute(2, "owner", "ops")],
        }
    }

    fn host(id: i32, name: &str) -> HostView {
        HostView {
            id,
            name: name.to_string(),
            label: Some(format!("label {name}")),
            attributes: vec![],
        }
    }

    fn service() -> ServiceView {
        ServiceView {
            id: 3,
            updated: "2016-10-02T05:55:00+00:00".to_string(),
            arguments: Some("--port 8080".to_string()),
            host: host(1, "foo"),
            deployment: DeploymentView {
                id: 1,
                name: "default".to_string(),
                label: None,
            },
            component: ComponentView {
                id: 4,
                application: ApplicationView {
                    id: 2,
                    name: "bar".to_string(),
                    label: None,
                    description: None,
                    attributes: vec![],
                },
                version: VersionView {
                    id: 5,
                    name: "1.2.3.4".to_string(),
                },
            },
        }
    }

    #[test]
    fn encode_writes_type_tag_and_fields() {
        let v = encode(&cluster()).unwrap();
        assert_eq!(v["type"], "cluster");
        assert_eq!(v["id"], 7);
        assert_eq!(v["name"], "Abigail");
        assert_eq!(v["attributes"][1]["name"], "owner");
    }

    #[test]
    fn cluster_round_trips() {
        let before = cluster();
        let back: ClusterView = from_json(&to_json(&before).unwrap()).unwrap();
        assert_eq!(back, before);
    }

    #[test]
    fn host_round_trips() {
        let before = host(11, "Smith");
        let back: HostView = decode(encode(&before).unwrap()).unwrap();
        assert_eq!(back, before);
        assert_eq!(back.label.as_deref(), Some("label Smith"));
    }

    #[test]
    fn detail_round_trips_preserving_order() {
        let mut deployment_applications = std::collections::BTreeMap::new();
        deployment_applications.insert(
            "default".to_string(),
            vec![service().component.application],
        );
        let before = ClusterDetailView {
            cluster: cluster(),
            hosts: vec![host(2, "b"), host(1, "a")],
            deployments: vec![service().deployment],
            applications: vec![service().component.application],
            services: vec![service()],
            deployment_applications,
        };

        let back: ClusterDetailView = decode(encode(&before).unwrap()).unwrap();
        assert_eq!(back, before);
        assert_eq!(back.hosts[0].name, "b");
    }

    #[test]
    fn detail_is_superset_of_summary() {
        let detail = HostDetailView {
            host: host(1, "foo"),
            cluster: None,
            services: vec![],
        };

        let summary = encode(&detail.host).unwrap();
        let full = encode(&detail).unwrap();
        for (key, value) in summary.as_object().unwrap() {
            if key == TYPE_KEY {
                continue;
            }
            assert_eq!(&full[key], value, "field {key}");
        }
        assert_eq!(full["type"], "host_detail");
    }

    #[test]
    fn empty_relations_are_present() {
        let detail = HostDetailView {
            host: host(1, "foo"),
            cluster: None,
            services: vec![],
        };
        let v = encode(&detail).unwrap();
        let obj = v.as_object().unwrap();

        assert_eq!(obj.get("cluster"), Some(&Value::Null));
        assert_eq!(obj.get("services"), Some(&Value::Array(vec![])));
        assert_eq!(obj.get("attributes"), Some(&Value::Array(vec![])));
    }

    #[test]
    fn decode_rejects_other_type() {
        let encoded = encode(&host(1, "foo")).unwrap();
        let err = decode::<ClusterView>(encoded).unwrap_err();
        match err {
            ViewError::TypeMismatch { expected, found } => {
                assert_eq!(expected, "cluster");
                assert_eq!(found, "host");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn decode_rejects_missing_tag() {
        let raw = serde_json::json!({ "id": 1, "name": "x" });
        assert!(matches!(
            decode::<VersionView>(raw),
            Err(ViewError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn decode_rejects_non_object() {
        assert!(matches!(
            decode::<VersionView>(Value::Bool(true)),
            Err(ViewError::NotAnObject)
        ));
    }

    #[test]
    fn list_round_trips() {
        let hosts = vec![host(1, "a"), host(2, "b")];
        let back: Vec<HostView> = decode_list(encode_list(&hosts).unwrap()).unwrap();
        assert_eq!(back, hosts);
    }

    #[test]
    fn service_round_trips_with_nested_component() {
        let before = service();
        let back: ServiceView = decode(encode(&before).unwrap()).unwrap();
        assert_eq!(back, before);
        assert_eq!(back.component.version.name, "1.2.3.4");
    }
}

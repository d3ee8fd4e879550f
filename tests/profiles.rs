//! Whole-profile scenarios driven through `plan_node` from JSON input.

use pretty_assertions::assert_eq;
use profile_planner::params::{Transport, TypedKey};
use profile_planner::{ConfigurationError, NodePlan, ProfileInput, plan_node};
use serde_json::{Value, json};

const KEYSTONE_FORMAT: &str = r"/(?<time>\d{4}-\d{2}-\d{2} \d{2} =>\d{2}:\d{2}.\d+) (?<pid>\d+) (?<priority>\S+) (?<message>.*)$/";

fn run(doc: Value) -> Result<NodePlan, ConfigurationError> {
    let input: ProfileInput = serde_json::from_value(doc).expect("valid input document");
    plan_node(&input)
}

fn node(step: u32, bootstrap: Option<&str>) -> Value {
    json!({
        "step": step,
        "self_identity": "node.example.com",
        "bootstrap_identity": bootstrap,
    })
}

fn keystone_source(path: &str) -> Value {
    json!({
        "format": KEYSTONE_FORMAT,
        "path": path,
        "pos_file": "/var/cache/fluentd/openstack.keystone.pos",
        "tag": "openstack.keystone",
        "type": "tail"
    })
}

mod logging {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn step_three_plans_nothing() {
        let plan = run(json!({ "node": node(3, None), "logging": {} })).unwrap();
        assert!(plan.logging.unwrap().is_skipped());
    }

    #[test]
    fn step_four_installs_plugin() {
        let plan = run(json!({ "node": node(4, None), "logging": {} })).unwrap();
        let out = serde_json::to_value(plan.logging.unwrap()).unwrap();
        assert_eq!(out["status"], "admitted");
        assert_eq!(
            out["detail"]["plugins"],
            json!([{ "name": "rubygem-fluent-plugin-add", "provider": "yum" }])
        );
    }

    #[test]
    fn explicit_source_is_passed_through() {
        let plan = run(json!({
            "node": node(4, None),
            "logging": { "sources": [keystone_source("/var/log/keystone/keystone.log")] }
        }))
        .unwrap();
        let logging = plan.logging.unwrap();
        let directives = &logging.admitted().unwrap().directives;

        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].file_name(), "100-openstack-sources.conf");
        assert_eq!(
            directives[0].body,
            json!({ "source": [keystone_source("/var/log/keystone/keystone.log")] })
        );
    }

    #[test]
    fn explicit_source_is_relocated() {
        let plan = run(json!({
            "node": node(4, None),
            "logging": {
                "sources": [keystone_source("/var/log/keystone/keystone.log")],
                "path_transform": ["/var/log/", "/var/log/containers/"]
            }
        }))
        .unwrap();
        let logging = plan.logging.unwrap();
        assert_eq!(
            logging.admitted().unwrap().directives[0].body,
            json!({ "source": [keystone_source("/var/log/containers/keystone/keystone.log")] })
        );
    }

    #[test]
    fn config_by_service() {
        let plan = run(json!({
            "node": node(4, None),
            "logging": {
                "default_format": KEYSTONE_FORMAT,
                "manage_groups": false,
                "pos_file_path": "/var/cache/fluentd/",
                "service_names": ["ceilometer_agent_central"]
            }
        }))
        .unwrap();
        let logging = plan.logging.unwrap();
        let plan = logging.admitted().unwrap();

        assert_eq!(plan.directories, vec!["/var/cache/fluentd/".to_string()]);
        assert_eq!(plan.directives.len(), 1);
        assert_eq!(
            plan.directives[0].path,
            "/etc/fluentd/config.d/100-openstack-ceilometer_agent_central.conf"
        );
        assert_eq!(
            plan.directives[0].body,
            json!({ "default_format": KEYSTONE_FORMAT, "pos_file_path": "/var/cache/fluentd/" })
        );
        assert_eq!(plan.group, None);
    }

    #[test]
    fn groups_by_service() {
        let plan = run(json!({
            "node": node(4, None),
            "logging": {
                "default_format": KEYSTONE_FORMAT,
                "pos_file_path": "/var/cache/fluentd/",
                "service_names": ["ceilometer_agent_central"],
                "manage_groups": true,
                "groups": ["fluentd"]
            }
        }))
        .unwrap();
        let out = serde_json::to_value(plan.logging.unwrap()).unwrap();
        assert_eq!(
            out["detail"]["group"],
            json!({
                "group_name": "fluentd",
                "members": ["ceilometer", "fluentd"],
                "policy": "minimum"
            })
        );
    }

    #[test]
    fn unknown_service_aborts() {
        let result = run(json!({
            "node": node(4, None),
            "logging": {
                "default_format": KEYSTONE_FORMAT,
                "pos_file_path": "/var/cache/fluentd/",
                "service_names": ["keystone", "not_a_service"]
            }
        }));
        assert_eq!(
            result,
            Err(ConfigurationError::UnknownService("not_a_service".into()))
        );
    }

    #[test]
    fn repeated_service_name_aborts() {
        let result = run(json!({
            "node": node(4, None),
            "logging": {
                "default_format": KEYSTONE_FORMAT,
                "pos_file_path": "/var/cache/fluentd/",
                "service_names": ["keystone", "keystone"]
            }
        }));
        assert_eq!(
            result,
            Err(ConfigurationError::DuplicateService("keystone".into()))
        );
    }

    #[test]
    fn later_steps_keep_earlier_output() {
        let logging = json!({
            "sources": [keystone_source("/var/log/keystone/keystone.log")],
            "default_format": KEYSTONE_FORMAT,
            "pos_file_path": "/var/cache/fluentd/",
            "service_names": ["keystone"]
        });
        let four = run(json!({ "node": node(4, None), "logging": logging.clone() })).unwrap();
        let five = run(json!({ "node": node(5, None), "logging": logging })).unwrap();
        assert_eq!(four.logging, five.logging);
    }

    #[test]
    fn replanning_is_byte_identical() {
        let doc = json!({
            "node": node(4, None),
            "logging": {
                "sources": [keystone_source("/var/log/keystone/keystone.log")],
                "default_format": KEYSTONE_FORMAT,
                "pos_file_path": "/var/cache/fluentd/",
                "service_names": ["nova_api", "ceilometer_agent_central"],
                "shared_defaults": { "flush_interval": "5s" }
            }
        });
        let first = serde_json::to_string(&run(doc.clone()).unwrap()).unwrap();
        let second = serde_json::to_string(&run(doc).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}

mod nova {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nova(step: u32, bootstrap: &str, extra: Value) -> NodePlan {
        let mut params = json!({ "rabbit_hosts": ["127.0.0.1"], "memcache_hosts": ["127.0.0.1"] });
        if let (Value::Object(params), Value::Object(extra)) = (&mut params, extra) {
            params.extend(extra);
        }
        run(json!({ "node": node(step, Some(bootstrap)), "nova": params })).unwrap()
    }

    #[test]
    fn step_one_plans_nothing() {
        let plan = nova(1, "node.example.com", json!({}));
        assert!(plan.nova.unwrap().is_skipped());
    }

    #[test]
    fn step_three_on_bootstrap_node() {
        let plan = nova(3, "node.example.com", json!({}));
        let out = serde_json::to_value(plan.nova.unwrap()).unwrap();
        assert_eq!(out["detail"]["rabbit_hosts"], json!(["127.0.0.1:5672"]));
        assert_eq!(
            out["detail"]["cache"],
            json!({
                "enabled": true,
                "backend": "oslo_cache.memcache_pool",
                "memcache_servers": ["127.0.0.1:11211"]
            })
        );
    }

    #[test]
    fn step_three_not_on_bootstrap_node() {
        let plan = nova(3, "other.example.com", json!({}));
        assert!(plan.nova.unwrap().is_skipped());
    }

    #[test]
    fn step_four_without_migration() {
        let plan = nova(4, "other.example.com", json!({}));
        let nova = plan.nova.unwrap();
        let plan = nova.admitted().unwrap();
        assert!(!plan.rabbit_hosts.is_empty());
        assert_eq!(plan.nova_public_key, None);
        assert_eq!(plan.nova_private_key, None);
        assert_eq!(plan.migration, None);
    }

    #[test]
    fn step_four_with_libvirt_and_tls() {
        let libvirt = json!({
            "libvirt_enabled": true,
            "manage_migration": true,
            "nova_compute_enabled": true
        });
        let ssh = nova(4, "node.example.com", libvirt.clone());
        let migration = ssh.nova.unwrap().admitted().unwrap().migration.clone().unwrap();
        assert_eq!(migration.transport, Transport::Ssh);
        assert!(migration.configure_libvirt);
        assert!(migration.configure_nova);

        let mut tls_params = libvirt;
        tls_params["libvirt_tls"] = json!(true);
        let tls = nova(4, "node.example.com", tls_params);
        let migration = tls.nova.unwrap().admitted().unwrap().migration.clone().unwrap();
        assert_eq!(migration.transport, Transport::Tls);
    }

    #[test]
    fn step_four_with_migration_ssh_key() {
        let plan = nova(
            4,
            "node.example.com",
            json!({
                "libvirt_enabled": true,
                "manage_migration": true,
                "nova_compute_enabled": true,
                "libvirt_tls": true,
                "migration_ssh_key": { "private_key": "foo", "public_key": "ssh-rsa bar" }
            }),
        );
        let nova = plan.nova.unwrap();
        let plan = nova.admitted().unwrap();
        assert_eq!(
            plan.nova_public_key,
            Some(TypedKey { key_type: "ssh-rsa".into(), key: "bar".into() })
        );
        assert_eq!(
            plan.nova_private_key,
            Some(TypedKey { key_type: "ssh-rsa".into(), key: "foo".into() })
        );
        assert!(!plan.notification_transport_url.is_empty());
        assert_eq!(plan.migration.as_ref().map(|m| m.transport), Some(Transport::Tls));
    }

    #[test]
    fn private_key_with_own_type_is_decomposed() {
        let plan = nova(
            4,
            "node.example.com",
            json!({
                "migration_ssh_key": { "private_key": "ssh-ed25519 foo", "public_key": "ssh-rsa bar" }
            }),
        );
        let nova = plan.nova.unwrap();
        assert_eq!(
            nova.admitted().unwrap().nova_private_key,
            Some(TypedKey { key_type: "ssh-ed25519".into(), key: "foo".into() })
        );
    }
}

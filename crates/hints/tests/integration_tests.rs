//! 통합 테스트 -- 이벤트에서 설정 목록까지 전체 생성 흐름 검증
//!
//! docker / container / filestream 템플릿별로 힌트 조합을 생성기에 통과시키고
//! 결과 설정 전체를 비교합니다.

use std::sync::Arc;

use serde_json::{Value, json};

use loghint_core::config::HintsConfig;
use loghint_core::event::DiscoveryEvent;
use loghint_core::registry::{FilesetTemplate, ModuleRegistry};
use loghint_hints::{ConfigGenerator, ModuleLoader, StaticModuleRegistry};

// --- 헬퍼 ---

fn apache_registry() -> Arc<dyn ModuleRegistry> {
    Arc::new(StaticModuleRegistry::new().with_module(
        "apache",
        vec![FilesetTemplate::new("access"), FilesetTemplate::new("error")],
    ))
}

fn generator_for(default_config: Option<Value>) -> ConfigGenerator {
    let mut config = HintsConfig::default();
    config.default_config = default_config;
    ConfigGenerator::from_config(&config, apache_registry())
}

fn docker_generator() -> ConfigGenerator {
    generator_for(Some(json!({
        "type": "docker",
        "containers": {"ids": ["${data.container.id}"]},
        "close_timeout": "true"
    })))
}

fn container_generator() -> ConfigGenerator {
    generator_for(Some(json!({
        "type": "container",
        "paths": ["/var/lib/docker/containers/${data.container.id}/*-json.log"],
        "close_timeout": "true",
        "processors": [
            {"add_tags": {"tags": ["web"], "target": "environment"}}
        ]
    })))
}

fn filestream_generator() -> ConfigGenerator {
    generator_for(Some(json!({
        "type": "filestream",
        "id": "kubernetes-container-logs-${data.kubernetes.container.id}",
        "prospector": {
            "scanner": {"fingerprint.enabled": true, "symlinks": true}
        },
        "file_identity.fingerprint": null,
        "paths": ["/var/log/containers/*-${data.kubernetes.container.id}.log"],
        "parsers": [{"container": {"stream": "all", "format": "auto"}}]
    })))
}

fn paths_generator(path: &str) -> ConfigGenerator {
    generator_for(Some(json!({
        "type": "docker",
        "containers": {"paths": [path]},
        "close_timeout": "true"
    })))
}

fn event_with_hints(hints: Value) -> DiscoveryEvent {
    let mut event = json!({
        "host": "1.2.3.4",
        "kubernetes": {
            "container": {"name": "foobar", "id": "abc"},
            "pod": {"name": "pod", "uid": "12345"}
        },
        "container": {"name": "foobar", "id": "abc"}
    });
    if !hints.is_null() {
        event["hints"] = hints;
    }
    DiscoveryEvent::from_value(event).expect("test event is a mapping")
}

fn generate(generator: &ConfigGenerator, event: &DiscoveryEvent) -> Vec<Value> {
    generator
        .generate(event)
        .into_iter()
        .map(|config| config.into_value())
        .collect()
}

/// 내장 템플릿을 abc 컨테이너로 해석한 결과 (parsers 제외 공통부)
fn resolved_filestream(parsers: Value) -> Value {
    json!({
        "type": "filestream",
        "id": "kubernetes-container-logs-abc",
        "paths": ["/var/log/containers/*-abc.log"],
        "parsers": parsers,
        "prospector": {
            "scanner": {"symlinks": true, "fingerprint": {"enabled": true}}
        },
        "file_identity": {"fingerprint": null}
    })
}

fn docker_input(stream: Option<&str>) -> Value {
    let mut containers = json!({"ids": ["abc"]});
    if let Some(stream) = stream {
        containers["stream"] = json!(stream);
    }
    json!({"type": "docker", "containers": containers, "close_timeout": "true"})
}

// --- 기본 템플릿 / 활성화 ---

#[test]
fn default_config_is_builtin_filestream() {
    let configs = generate(&generator_for(None), &event_with_hints(Value::Null));
    assert_eq!(
        configs,
        vec![resolved_filestream(json!([
            {"container": {"format": "auto", "stream": "all"}}
        ]))]
    );
}

#[test]
fn disabled_default_config_emits_nothing() {
    let generator = generator_for(Some(json!({"enabled": "false"})));
    assert!(generate(&generator, &event_with_hints(Value::Null)).is_empty());
}

#[test]
fn enabled_hint_overrides_disabled_default() {
    let generator = generator_for(Some(json!({"enabled": "false"})));
    let configs = generate(
        &generator,
        &event_with_hints(json!({"logs": {"enabled": "true", "exclude_lines": "^test2, ^test3"}})),
    );
    let mut expected = resolved_filestream(json!([
        {"container": {"format": "auto", "stream": "all"}}
    ]));
    expected["exclude_lines"] = json!(["^test2", "^test3"]);
    assert_eq!(configs, vec![expected]);
}

#[test]
fn event_without_host_emits_nothing() {
    let event = DiscoveryEvent::from_value(json!({
        "hints": {"metrics": {"module": "prometheus"}}
    }))
    .unwrap();
    assert!(generate(&docker_generator(), &event).is_empty());
}

#[test]
fn event_without_host_ignores_hints() {
    let event = DiscoveryEvent::from_value(json!({
        "container": {"id": "abc"},
        "hints": {"logs": {"enabled": "true", "include_lines": "^a"}}
    }))
    .unwrap();
    assert!(generate(&docker_generator(), &event).is_empty());
}

#[test]
fn logs_disable_emits_nothing() {
    let configs = generate(
        &docker_generator(),
        &event_with_hints(json!({"logs": {"disable": "true"}})),
    );
    assert!(configs.is_empty());
}

#[test]
fn empty_hints_return_docker_default() {
    let configs = generate(&docker_generator(), &event_with_hints(Value::Null));
    assert_eq!(configs, vec![docker_input(None)]);
}

// --- 라인 필터 / 번호 그룹 ---

#[test]
fn include_exclude_lines_are_split() {
    let configs = generate(
        &docker_generator(),
        &event_with_hints(json!({"logs": {
            "include_lines": "^test, ^test1",
            "exclude_lines": "^test2, ^test3"
        }})),
    );
    let mut expected = docker_input(None);
    expected["include_lines"] = json!(["^test", "^test1"]);
    expected["exclude_lines"] = json!(["^test2", "^test3"]);
    assert_eq!(configs, vec![expected]);
}

#[test]
fn two_indexed_sets_yield_two_configs_in_order() {
    let configs = generate(
        &docker_generator(),
        &event_with_hints(json!({"logs": {
            "2": {"include_lines": "^test1, ^test2"},
            "1": {"exclude_lines": "^test1, ^test2"}
        }})),
    );
    let mut first = docker_input(None);
    first["exclude_lines"] = json!(["^test1", "^test2"]);
    let mut second = docker_input(None);
    second["include_lines"] = json!(["^test1", "^test2"]);
    assert_eq!(configs, vec![first, second]);
}

#[test]
fn disabled_indexed_set_only_drops_itself() {
    let configs = generate(
        &docker_generator(),
        &event_with_hints(json!({"logs": {
            "1": {"exclude_lines": "^a", "disable": "true"},
            "2": {"include_lines": "^b"}
        }})),
    );
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0]["include_lines"], json!(["^b"]));
}

#[test]
fn unknown_hint_keys_do_not_leak_into_config() {
    let configs = generate(
        &docker_generator(),
        &event_with_hints(json!({"logs": {
            "bogus_key": "leak",
            "exclude_lines": "^a"
        }})),
    );
    let mut expected = docker_input(None);
    expected["exclude_lines"] = json!(["^a"]);
    assert_eq!(configs, vec![expected]);
}

#[test]
fn hint_matching_template_field_overwrites_it() {
    let configs = generate(
        &docker_generator(),
        &event_with_hints(json!({"logs": {"close_timeout": "5m"}})),
    );
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0]["close_timeout"], "5m");
}

// --- multiline / json ---

#[test]
fn multiline_on_docker_input() {
    let configs = generate(
        &docker_generator(),
        &event_with_hints(json!({"logs": {"multiline": {"pattern": "^test", "negate": "true"}}})),
    );
    let mut expected = docker_input(None);
    expected["multiline"] = json!({"pattern": "^test", "negate": "true"});
    assert_eq!(configs, vec![expected]);
}

#[test]
fn multiline_on_filestream_appends_parser() {
    let configs = generate(
        &filestream_generator(),
        &event_with_hints(json!({"logs": {"multiline": {"pattern": "^test", "negate": "true"}}})),
    );
    assert_eq!(
        configs,
        vec![resolved_filestream(json!([
            {"container": {"format": "auto", "stream": "all"}},
            {"multiline": {"pattern": "^test", "negate": "true"}}
        ]))]
    );
}

#[test]
fn json_on_filestream_appends_ndjson_parser() {
    let configs = generate(
        &filestream_generator(),
        &event_with_hints(json!({"logs": {"json": {"add_error_key": true, "expand_keys": true}}})),
    );
    assert_eq!(
        configs,
        vec![resolved_filestream(json!([
            {"container": {"format": "auto", "stream": "all"}},
            {"ndjson": {"add_error_key": true, "expand_keys": true}}
        ]))]
    );
}

#[test]
fn json_on_container_input() {
    let configs = generate(
        &container_generator(),
        &event_with_hints(json!({"logs": {"json": {"add_error_key": true, "expand_keys": true}}})),
    );
    assert_eq!(
        configs,
        vec![json!({
            "type": "container",
            "paths": ["/var/lib/docker/containers/abc/*-json.log"],
            "close_timeout": "true",
            "json": {"add_error_key": true, "expand_keys": true},
            "processors": [
                {"add_tags": {"tags": ["web"], "target": "environment"}}
            ]
        })]
    );
}

// --- raw ---

#[test]
fn raw_json_inputs_are_accepted() {
    let raw = r#"[{"containers":{"ids":["${data.container.id}"]},"multiline":{"negate":"true","pattern":"^test"},"type":"docker"}]"#;
    let configs = generate(
        &docker_generator(),
        &event_with_hints(json!({"logs": {"raw": raw}})),
    );
    assert_eq!(
        configs,
        vec![json!({
            "type": "docker",
            "containers": {"ids": ["abc"]},
            "multiline": {"pattern": "^test", "negate": "true"}
        })]
    );
}

#[test]
fn raw_with_two_entries_yields_two_configs() {
    let raw = r#"[{"type":"log","paths":["/a/${data.container.id}"]},{"type":"log","paths":["/b/${data.container.name}"]}]"#;
    let configs = generate(
        &docker_generator(),
        &event_with_hints(json!({"logs": {"raw": raw, "include_lines": "^ignored"}})),
    );
    assert_eq!(
        configs,
        vec![
            json!({"type": "log", "paths": ["/a/abc"]}),
            json!({"type": "log", "paths": ["/b/foobar"]}),
        ]
    );
}

#[test]
fn raw_entry_with_unresolved_token_is_dropped_alone() {
    let raw = r#"[{"type":"log","paths":["/a"]},{"type":"log","paths":["/b/${data.missing}"]}]"#;
    let configs = generate(
        &docker_generator(),
        &event_with_hints(json!({"logs": {"raw": raw}})),
    );
    assert_eq!(configs, vec![json!({"type": "log", "paths": ["/a"]})]);
}

// --- processors ---

#[test]
fn processors_hint_becomes_sequence() {
    let configs = generate(
        &docker_generator(),
        &event_with_hints(json!({"logs": {"processors": {
            "1": {"dissect": {"tokenizer": "%{key1} %{key2}"}},
            "drop_event": {}
        }}})),
    );
    let mut expected = docker_input(None);
    expected["processors"] = json!([
        {"dissect": {"tokenizer": "%{key1} %{key2}"}},
        {"drop_event": {}}
    ]);
    assert_eq!(configs, vec![expected]);
}

#[test]
fn processors_are_appended_after_template() {
    let configs = generate(
        &container_generator(),
        &event_with_hints(json!({"logs": {"processors": {
            "1": {"dissect": {"tokenizer": "%{key1} %{key2}"}},
            "drop_event": {}
        }}})),
    );
    assert_eq!(
        configs,
        vec![json!({
            "type": "container",
            "paths": ["/var/lib/docker/containers/abc/*-json.log"],
            "close_timeout": "true",
            "processors": [
                {"add_tags": {"tags": ["web"], "target": "environment"}},
                {"dissect": {"tokenizer": "%{key1} %{key2}"}},
                {"drop_event": {}}
            ]
        })]
    );
}

// --- 모듈 (docker 템플릿) ---

#[test]
fn module_attaches_input_to_all_filesets_docker() {
    let configs = generate(
        &docker_generator(),
        &event_with_hints(json!({"logs": {"module": "apache"}})),
    );
    assert_eq!(
        configs,
        vec![json!({
            "module": "apache",
            "access": {"enabled": true, "input": docker_input(Some("all"))},
            "error": {"enabled": true, "input": docker_input(Some("all"))}
        })]
    );
}

#[test]
fn module_honors_single_fileset_docker() {
    let configs = generate(
        &docker_generator(),
        &event_with_hints(json!({"logs": {"module": "apache", "fileset": "access"}})),
    );
    assert_eq!(
        configs,
        vec![json!({
            "module": "apache",
            "access": {"enabled": true, "input": docker_input(Some("all"))},
            "error": {"enabled": false, "input": docker_input(Some("all"))}
        })]
    );
}

#[test]
fn module_honors_fileset_streams_docker() {
    let configs = generate(
        &docker_generator(),
        &event_with_hints(json!({"logs": {
            "module": "apache",
            "fileset.stdout": "access",
            "fileset.stderr": "error"
        }})),
    );
    assert_eq!(
        configs,
        vec![json!({
            "module": "apache",
            "access": {"enabled": true, "input": docker_input(Some("stdout"))},
            "error": {"enabled": true, "input": docker_input(Some("stderr"))}
        })]
    );
}

#[test]
fn unbound_fileset_is_disabled() {
    let configs = generate(
        &docker_generator(),
        &event_with_hints(json!({"logs": {"module": "apache", "fileset.stderr": "error"}})),
    );
    assert_eq!(configs[0]["access"]["enabled"], false);
    assert_eq!(configs[0]["error"]["enabled"], true);
    assert_eq!(configs[0]["error"]["input"]["containers"]["stream"], "stderr");
}

// --- 모듈 (내장 filestream 템플릿) ---

fn filestream_fileset(enabled: bool, stream: &str) -> Value {
    json!({
        "enabled": enabled,
        "input": resolved_filestream(json!([
            {"container": {"format": "auto", "stream": stream}}
        ]))
    })
}

#[test]
fn module_attaches_input_to_all_filesets_default() {
    let configs = generate(
        &generator_for(None),
        &event_with_hints(json!({"logs": {"module": "apache"}})),
    );
    assert_eq!(
        configs,
        vec![json!({
            "module": "apache",
            "access": filestream_fileset(true, "all"),
            "error": filestream_fileset(true, "all")
        })]
    );
}

#[test]
fn module_honors_single_fileset_default() {
    let configs = generate(
        &generator_for(None),
        &event_with_hints(json!({"logs": {"module": "apache", "fileset": "access"}})),
    );
    assert_eq!(
        configs,
        vec![json!({
            "module": "apache",
            "access": filestream_fileset(true, "all"),
            "error": filestream_fileset(false, "all")
        })]
    );
}

#[test]
fn module_honors_fileset_streams_default() {
    let configs = generate(
        &generator_for(None),
        &event_with_hints(json!({"logs": {
            "module": "apache",
            "fileset.stdout": "access",
            "fileset.stderr": "error"
        }})),
    );
    assert_eq!(
        configs,
        vec![json!({
            "module": "apache",
            "access": filestream_fileset(true, "stdout"),
            "error": filestream_fileset(true, "stderr")
        })]
    );
}

#[test]
fn overridden_type_keeps_stream_on_container_parser() {
    let configs = generate(
        &filestream_generator(),
        &event_with_hints(json!({"logs": {
            "type": "container",
            "module": "apache",
            "fileset.stdout": "access",
            "multiline.pattern": "^x"
        }})),
    );
    assert_eq!(configs.len(), 1);
    let access = &configs[0]["access"];
    assert_eq!(access["enabled"], true);
    assert_eq!(access["input"]["type"], "container");
    assert_eq!(
        access["input"]["parsers"],
        json!([
            {"container": {"stream": "stdout", "format": "auto"}},
            {"multiline": {"pattern": "^x"}}
        ])
    );
    assert!(access["input"].get("containers").is_none());
    assert_eq!(configs[0]["error"]["enabled"], false);
}

#[test]
fn unknown_module_yields_no_configs() {
    let configs = generate(
        &docker_generator(),
        &event_with_hints(json!({"logs": {"module": "redis"}})),
    );
    assert!(configs.is_empty());
}

// --- 경로 플레이스홀더 ---

#[test]
fn paths_resolve_with_default_config() {
    let generator =
        paths_generator("/var/lib/docker/containers/${data.kubernetes.container.id}/*-json.log");
    let configs = generate(&generator, &event_with_hints(Value::Null));
    assert_eq!(
        configs,
        vec![json!({
            "type": "docker",
            "containers": {"paths": ["/var/lib/docker/containers/abc/*-json.log"]},
            "close_timeout": "true"
        })]
    );
}

#[test]
fn paths_resolve_with_processors() {
    let generator = paths_generator(
        "/var/log/pods/${data.kubernetes.pod.uid}/${data.kubernetes.container.name}/*.log",
    );
    let configs = generate(
        &generator,
        &event_with_hints(json!({"logs": {"processors": {
            "1": {"dissect": {"tokenizer": "%{key1} %{key2}"}},
            "drop_event": {}
        }}})),
    );
    assert_eq!(
        configs,
        vec![json!({
            "type": "docker",
            "containers": {"paths": ["/var/log/pods/12345/foobar/*.log"]},
            "close_timeout": "true",
            "processors": [
                {"dissect": {"tokenizer": "%{key1} %{key2}"}},
                {"drop_event": {}}
            ]
        })]
    );
}

#[test]
fn paths_resolve_inside_module_filesets() {
    let generator = paths_generator(
        "/var/log/pods/${data.kubernetes.pod.uid}/${data.kubernetes.container.name}/*.log",
    );
    let configs = generate(
        &generator,
        &event_with_hints(json!({"logs": {"module": "apache", "fileset": "access"}})),
    );
    let input = json!({
        "type": "docker",
        "containers": {"stream": "all", "paths": ["/var/log/pods/12345/foobar/*.log"]},
        "close_timeout": "true"
    });
    assert_eq!(
        configs,
        vec![json!({
            "module": "apache",
            "access": {"enabled": true, "input": input.clone()},
            "error": {"enabled": false, "input": input}
        })]
    );
}

#[test]
fn unresolvable_path_drops_candidate() {
    let generator = paths_generator("/var/log/pods/${data.kubernetes.namespace}/*.log");
    assert!(generate(&generator, &event_with_hints(Value::Null)).is_empty());
}

// --- 모듈 매니페스트 로더 ---

#[tokio::test]
async fn loader_reads_manifests_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(
        dir.path().join("apache.yml"),
        "module: apache\nfilesets:\n  - name: access\n  - name: error\n",
    )
    .await
    .unwrap();
    tokio::fs::write(
        dir.path().join("nginx.yaml"),
        "module: nginx\nfilesets:\n  - name: access\n  - name: ingress_controller\n    enabled: false\n",
    )
    .await
    .unwrap();
    tokio::fs::write(dir.path().join("README.txt"), "not a manifest")
        .await
        .unwrap();

    let registry = ModuleLoader::load_directory(dir.path()).await.unwrap();
    assert_eq!(registry.modules(), vec!["apache", "nginx"]);

    let nginx = registry.filesets("nginx").unwrap();
    assert!(nginx[0].default_enabled);
    assert!(!nginx[1].default_enabled);
}

#[tokio::test]
async fn loader_skips_broken_and_duplicate_manifests() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(
        dir.path().join("a_apache.yml"),
        "module: apache\nfilesets:\n  - name: access\n",
    )
    .await
    .unwrap();
    tokio::fs::write(
        dir.path().join("b_apache.yml"),
        "module: apache\nfilesets:\n  - name: other\n",
    )
    .await
    .unwrap();
    tokio::fs::write(dir.path().join("c_broken.yml"), "module: [")
        .await
        .unwrap();

    let registry = ModuleLoader::load_directory(dir.path()).await.unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.filesets("apache").unwrap()[0].name, "access");
}

#[tokio::test]
async fn loaded_registry_drives_module_expansion() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(
        dir.path().join("nginx.yml"),
        concat!(
            "module: nginx\n",
            "filesets:\n",
            "  - name: access\n",
            "    input:\n",
            "      tags: [\"nginx-access\"]\n",
            "  - name: ingress_controller\n",
            "    enabled: false\n",
        ),
    )
    .await
    .unwrap();

    let registry = ModuleLoader::load_directory(dir.path()).await.unwrap();
    let config = HintsConfig::default().with_default_config(json!({
        "type": "docker",
        "containers": {"ids": ["${data.container.id}"]}
    }));
    let generator = ConfigGenerator::from_config(&config, Arc::new(registry));

    let configs = generate(
        &generator,
        &event_with_hints(json!({"logs": {"module": "nginx"}})),
    );
    assert_eq!(
        configs,
        vec![json!({
            "module": "nginx",
            "access": {
                "enabled": true,
                "input": {
                    "type": "docker",
                    "containers": {"ids": ["abc"], "stream": "all"},
                    "tags": ["nginx-access"]
                }
            },
            "ingress_controller": {
                "enabled": false,
                "input": {
                    "type": "docker",
                    "containers": {"ids": ["abc"], "stream": "all"}
                }
            }
        })]
    );
}

// --- 동시성 ---

#[tokio::test]
async fn generator_is_shared_across_tasks() {
    let generator = Arc::new(docker_generator());
    let mut handles = Vec::new();
    for i in 0..8 {
        let generator = Arc::clone(&generator);
        handles.push(tokio::spawn(async move {
            let event = DiscoveryEvent::from_value(json!({
                "host": "1.2.3.4",
                "container": {"id": format!("c{i}")}
            }))
            .unwrap();
            generator.generate(&event)
        }));
    }
    for (i, handle) in handles.into_iter().enumerate() {
        let configs = handle.await.unwrap();
        assert_eq!(configs[0].as_mapping()["containers"]["ids"], json!([format!("c{i}")]));
    }
    assert_eq!(generator.template()["containers"]["ids"], json!(["${data.container.id}"]));
}

//! Integration tests for template rendering

use agent_forge::template::NoIncludes;
use agent_forge::{
    parse, render, render_with_config, Advisory, FsResolver, MemoryResolver, RenderError,
    TemplateConfig,
};
use pretty_assertions::assert_eq;

fn fixtures_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/agents")
}

#[test]
fn test_meta_model_placeholder() {
    let context = parse("meta:\n  model: sonnet\n");
    let rendered = render("{{ meta.model }}", &context, &NoIncludes).expect("Should render");
    assert_eq!(rendered.text, "sonnet");
}

#[test]
fn test_missing_include_is_not_fatal() {
    let template = r#"{% include "missing.md" %}"#;
    let rendered = render(template, &parse(""), &NoIncludes).expect("Should render");
    assert_eq!(rendered.text, r#"{% include "missing.md" %}"#);
    assert_eq!(rendered.advisories.len(), 1);
    assert!(rendered.advisories[0].to_string().contains("missing.md"));
}

#[test]
fn test_fs_includes_from_fixture_components() {
    let context = parse(
        "meta:\n  model: opus\n  tools: [Read, Bash]\nworkflow:\n  commit_style: conventional\n",
    );
    let resolver = FsResolver::new(fixtures_dir());
    let config = TemplateConfig::new().with_keep_trailing_newline(false);

    let rendered = render_with_config(
        "{% include \"components/work.md.j2\" %}",
        &context,
        &resolver,
        &config,
    )
    .expect("Should render");

    insta::assert_snapshot!(rendered.text, @r###"
    ## Work

    Allowed tools: Read, Bash
    - [ ] Follow conventional commits
    "###);
    assert!(rendered.advisories.is_empty());
}

#[test]
fn test_plain_template_renders_unchanged() {
    let template = "# Title\n\nBody with { braces } and no markers\n\n";
    let rendered = render(template, &parse(""), &NoIncludes).expect("Should render");
    assert_eq!(rendered.text, template);
    assert!(rendered.advisories.is_empty());
}

#[test]
fn test_mutual_inclusion_reports_cycle() {
    let resolver = MemoryResolver::new()
        .with("header.md", "H {% include \"footer.md\" %}")
        .with("footer.md", "F {% include \"header.md\" %}");
    let err = render("{% include \"header.md\" %}", &parse(""), &resolver).unwrap_err();
    assert_eq!(
        err,
        RenderError::CircularInclusion {
            chain: "header.md -> footer.md -> header.md".to_string()
        }
    );
    assert_eq!(
        err.to_string(),
        "circular inclusion detected: header.md -> footer.md -> header.md"
    );
}

#[test]
fn test_zero_depth_forbids_includes() {
    let resolver = MemoryResolver::new().with("a.md", "A");
    let config = TemplateConfig::new().with_max_include_depth(0);
    let err = render_with_config("{% include \"a.md\" %}", &parse(""), &resolver, &config)
        .unwrap_err();
    assert!(matches!(err, RenderError::DepthExceeded { limit: 0, .. }));
}

#[test]
fn test_rendering_twice_is_stable() {
    let context = parse("meta:\n  name: coder\n  tools:\n    - Read\n");
    let resolver = MemoryResolver::new().with("t.md", "tools={{ meta.tools }}");
    let template = "# {{ meta.name }} {% include \"t.md\" %}";

    let once = render(template, &context, &resolver).expect("Should render");
    let twice = render(&once.text, &context, &resolver).expect("Should render");
    assert_eq!(once.text, "# coder tools=Read");
    assert_eq!(twice.text, once.text);
}

#[test]
fn test_advisories_are_ordered() {
    let template = "{{ a }} {% include \"nope.md\" %} {{ b }}";
    let rendered = render(template, &parse("b: 1"), &NoIncludes).expect("Should render");
    assert_eq!(rendered.text, "{{ a }} {% include \"nope.md\" %} 1");
    assert!(matches!(
        &rendered.advisories[..],
        [
            Advisory::UnmatchedPlaceholder { .. },
            Advisory::UnresolvedInclude { .. }
        ]
    ));
}

use apilevels_history::{Api, ApiClass, ApiError, CleanupOptions};
use pretty_assertions::assert_eq;

fn sample_api() -> Api {
    let mut api = Api::new(1, 3);
    for version in 1..=3 {
        api.add_class("java/lang/Object", version, false)
            .add_method("<init>()V", version, false);
    }
    for version in 2..=3 {
        let a = api.add_class("p/A", version, false);
        a.add_super_class("java/lang/Object", version);
        a.add_field("X", version, version == 3);
        if version == 2 {
            a.add_method("run()V", version, false);
        }
    }
    api.add_hidden_class("p/Impl", 2, false);
    api
}

const SAMPLE_XML: &str = "<api version=\"2\">
\t<class name=\"java/lang/Object\">
\t\t<method name=\"&lt;init&gt;()V\"/>
\t</class>
\t<class name=\"p/A\" since=\"2\">
\t\t<extends name=\"java/lang/Object\"/>
\t\t<method name=\"run()V\" removed=\"3\"/>
\t\t<field name=\"X\" deprecated=\"3\"/>
\t</class>
</api>
";

#[test]
fn writes_attributes_relative_to_parent() {
    assert_eq!(sample_api().to_xml_string(), SAMPLE_XML);
}

#[test]
fn write_xml_matches_display() {
    let api = sample_api();
    let mut out = Vec::new();
    api.write_xml(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), api.xml().to_string());
}

#[test]
fn round_trip_reproduces_ranges_and_members() {
    let api = sample_api();
    // Never-public classes are not written.
    let expected = visible_classes(&api);

    let read = Api::from_xml(&api.to_xml_string(), api.max()).unwrap();
    assert_eq!((read.min(), read.max()), (api.min(), api.max()));
    assert_eq!(read.classes().cloned().collect::<Vec<_>>(), expected);
    assert_eq!(read.to_xml_string(), SAMPLE_XML);
}

#[test]
fn reads_min_and_inherits_missing_attributes() {
    let text = r#"<api version="2" min="4">
        <class name="p/A" since="5" removed="9">
            <method name="f()V"/>
            <field name="G" since="6" deprecated="7"/>
        </class>
    </api>"#;
    let api = Api::from_xml(text, 12).unwrap();
    assert_eq!((api.min(), api.max()), (4, 12));

    let class = api.find_class("p/A").unwrap();
    assert_eq!((class.since(), class.range().last_present_in()), (5, 8));
    let method = class.find_method("f()V").unwrap();
    assert_eq!((method.since(), method.last_present_in()), (5, 8));
    let field = class.find_field("G").unwrap();
    assert_eq!(
        (field.since(), field.deprecated_in(), field.last_present_in()),
        (6, Some(7), 8)
    );
}

fn visible_classes(api: &Api) -> Vec<ApiClass> {
    api.classes()
        .filter(|class| !class.is_always_hidden())
        .cloned()
        .collect()
}

#[test]
fn cleaned_model_round_trips() {
    let mut api = sample_api();
    for version in 1..=6 {
        let base = api.add_hidden_class("p/Base", version, false);
        base.add_field("LIMIT", version, false);
        base.add_method("shared()V", version, version >= 5);
    }
    for version in 4..=6 {
        api.add_class("p/Pub", version, false)
            .add_super_class("p/Base", version);
    }
    api.clean(&CleanupOptions::default());

    let read = Api::from_xml(&api.to_xml_string(), api.max()).unwrap();
    assert_eq!(read.classes().cloned().collect::<Vec<_>>(), visible_classes(&api));

    let public = read.find_class("p/Pub").unwrap();
    let members: Vec<_> = public
        .fields()
        .chain(public.methods())
        .map(|m| (m.name(), m.since(), m.deprecated_in(), m.last_present_in()))
        .collect();
    assert_eq!(
        members,
        vec![("LIMIT", 4, None, 6), ("shared()V", 4, Some(5), 6)]
    );
}

#[test]
fn rejects_unknown_elements() {
    let err = Api::from_xml(
        r#"<api version="2"><class name="p/A"><constructor name="x"/></class></api>"#,
        1,
    )
    .unwrap_err();
    assert_eq!(
        err,
        ApiError::InvalidXml("unexpected element <constructor>".to_owned())
    );
}

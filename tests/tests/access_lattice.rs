//! Access lattice over stored descriptors.

use mend_tests::prelude::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use proptest::sample::select;

fn design_descriptor(fixture: &Fixture, id: &str) -> AccessDescriptor<DesignRole> {
    let doc = fixture.get(&DocumentRef::new("designs", id)).unwrap();
    AccessDescriptor::from_document(doc, &DescriptorLayout::design())
}

#[test]
fn test_fixture_design_tiers() {
    let fixture = Fixture::load("workspace").unwrap();
    let design = design_descriptor(&fixture, "d-1");

    assert_eq!(design.mode, AccessMode::Restricted);
    assert_eq!(design.tier_of("u-1"), Some(DesignRole::Owner));
    assert_eq!(design.tier_of("u-2"), Some(DesignRole::Editor));
    assert_eq!(design.tier_of("u-3"), Some(DesignRole::Commenter));
    assert_eq!(design.tier_of("u-4"), Some(DesignRole::Viewer));
    assert_eq!(design.tier_of("u-5"), None);
}

#[test]
fn test_public_project_admits_unlisted_viewer_only() {
    let fixture = Fixture::load("workspace").unwrap();
    let doc = fixture.get(&DocumentRef::new("projects", "proj-1")).unwrap();
    let project = AccessDescriptor::<ProjectRole>::from_document(doc, &DescriptorLayout::project());

    assert!(AccessControl::is_allowed(&project, "u-5", ProjectRole::Viewer));
    assert!(!AccessControl::is_allowed(&project, "u-5", ProjectRole::Contributor));
    assert!(AccessControl::is_allowed(&project, "u-2", ProjectRole::Contributor));
    assert!(AccessControl::is_allowed(&project, "u-1", ProjectRole::Manager));
}

/// A viewer asking for an editor action is refused and nothing is planned.
#[test]
fn test_viewer_editing_restricted_design_builds_no_plan() {
    // GIVEN
    let fixture = Fixture::load("workspace").unwrap();
    let store = faulty_store(&fixture);
    let session = Session::new(&store, Config::default());
    let design = DocumentRef::new("designs", "d-1");
    let descriptor: AccessDescriptor<DesignRole> =
        session.descriptor(&design, &DescriptorLayout::design()).unwrap();

    // WHEN
    let allowed = AccessControl::is_allowed(&descriptor, "u-4", DesignRole::Editor);
    let result = session.run(|b| {
        b.require_access(&descriptor, "u-4", DesignRole::Editor)?;
        b.update(&design, payload_from_fields(fields! { "designName" => "Mine now" }))
    });

    // THEN
    assert!(!allowed);
    assert!(matches!(
        result,
        Err(mend_session::SessionError::Build(BuildError::PermissionDenied { .. }))
    ));
    assert!(store.writes().is_empty());
    assert_eq!(store.inner().snapshot(), *fixture.documents());
}

fn design_role() -> impl Strategy<Value = DesignRole> {
    select(DesignRole::ALL)
}

fn project_role() -> impl Strategy<Value = ProjectRole> {
    select(ProjectRole::ALL)
}

proptest! {
    #[test]
    fn prop_restricted_design_matches_tier_order(
        tier in design_role(),
        required in design_role(),
    ) {
        let design = AccessDescriptor::restricted("u-owner").with_member(tier, "u-actor");

        prop_assert_eq!(
            AccessControl::is_allowed(&design, "u-actor", required),
            tier >= required
        );
    }

    #[test]
    fn prop_public_editor_design_admits_anyone_up_to_editor(
        required in design_role(),
        actor in "u-[a-z]{1,6}",
    ) {
        let design = AccessDescriptor::restricted("u-owner").public(DesignRole::Editor);

        prop_assert_eq!(
            AccessControl::is_allowed(&design, &actor, required),
            required <= DesignRole::Editor || actor == "u-owner"
        );
    }

    #[test]
    fn prop_decoded_project_agrees_with_built_descriptor(
        listed in proptest::option::of(project_role()),
        public in proptest::option::of(project_role()),
        required in project_role(),
    ) {
        let mut doc = fields! { "managers" => list!["u-owner"] };
        let mut built = AccessDescriptor::<ProjectRole>::default()
            .with_member(ProjectRole::Manager, "u-owner");
        if let Some(tier) = listed {
            doc.insert(tier.list_field().to_string(), list!["u-actor"]);
            built = built.with_member(tier, "u-actor");
            if tier == ProjectRole::Manager {
                doc.insert(tier.list_field().to_string(), list!["u-owner", "u-actor"]);
            }
        }
        if let Some(tier) = public {
            doc.insert(
                "projectSettings".to_string(),
                Value::Map(fields! {
                    "generalAccessSetting" => 1i64,
                    "generalAccessRole" => tier.code(),
                }),
            );
            built = built.public(tier);
        }

        let decoded =
            AccessDescriptor::<ProjectRole>::from_document(&doc, &DescriptorLayout::project());

        prop_assert_eq!(&decoded, &built);
        prop_assert_eq!(
            AccessControl::is_allowed(&decoded, "u-actor", required),
            AccessControl::is_allowed(&built, "u-actor", required)
        );
    }
}

use pagestore_core::{
    clone_json, clone_json_opt, copy_matching_fields, City, CityWithoutPointsOfInterestDto,
    Comment, CopierRegistry, CopyConfig, CopyContext, CopyError, CopyResult, CopyStrategy,
    DeepCopy, Member, MemberComment, ObjectCopier, PointOfInterest,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

fn sample_city() -> City {
    City::new(1, "Antwerp")
        .with_description("The one with the cathedral that was never really finished.")
        .with_point_of_interest(PointOfInterest::new(1, "Cathedral"))
        .with_point_of_interest(PointOfInterest::new(2, "Antwerp Central Station"))
}

fn sample_member() -> Member {
    let mut member = Member {
        member_id: 7,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        member_comments: Vec::new(),
    };
    member.member_comments.push(MemberComment {
        member_id: 7,
        comment_id: 70,
        member: Some(Box::new(Member {
            member_id: 7,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            member_comments: Vec::new(),
        })),
        comment: Some(Comment {
            comment_id: 70,
            message: "first!".to_string(),
        }),
        something: 3,
        something_else: None,
    });
    member
}

#[test]
fn structural_copy_of_city_is_equal_and_independent() {
    let source = sample_city();
    let mut copy = source.deep_copy().unwrap();
    assert_eq!(copy, source);

    copy.name.push_str(" (copy)");
    copy.points_of_interest[0].name = "Zoo".to_string();
    copy.points_of_interest.pop();

    assert_eq!(source, sample_city());
}

#[test]
fn mutating_the_source_leaves_the_copy_unchanged() {
    let mut source = sample_city();
    let copy = source.deep_copy().unwrap();

    source.name.push_str(" (renamed)");
    source.description = None;
    source.points_of_interest[1].name = "Zoo".to_string();
    source
        .points_of_interest
        .push(PointOfInterest::new(3, "Harbour"));

    assert_eq!(copy, sample_city());

    let mut member = sample_member();
    let member_copy = clone_json(&member).unwrap();
    if let Some(comment) = member.member_comments[0].comment.as_mut() {
        comment.message = "edited".to_string();
    }
    member.member_comments.clear();
    assert_eq!(member_copy, sample_member());
}

#[test]
fn structural_copy_of_member_graph_preserves_absent_fields() {
    let source = sample_member();
    let mut copy = source.deep_copy().unwrap();
    assert_eq!(copy, source);
    assert_eq!(copy.member_comments[0].something_else, None);

    if let Some(nested) = copy.member_comments[0].member.as_mut() {
        nested.first_name = "Grace".to_string();
    }
    assert_eq!(
        source.member_comments[0]
            .member
            .as_ref()
            .map(|member| member.first_name.as_str()),
        Some("Ada")
    );
}

#[test]
fn shared_pointers_are_copied_to_new_allocations() {
    let shared = Rc::new(RefCell::new(sample_city()));
    let copy = shared.deep_copy().unwrap();

    assert!(!Rc::ptr_eq(&shared, &copy));
    copy.borrow_mut().name = "Ghent".to_string();
    assert_eq!(shared.borrow().name, "Antwerp");

    shared.borrow_mut().points_of_interest.clear();
    assert_eq!(copy.borrow().points_of_interest.len(), 2);
}

#[derive(Debug, Default)]
struct Node {
    value: u32,
    next: Option<Rc<RefCell<Node>>>,
}

impl DeepCopy for Node {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        ctx.enter(|ctx| {
            Ok(Self {
                value: self.value,
                next: self.next.deep_copy_in(ctx)?,
            })
        })
    }
}

#[test]
fn cyclic_graph_fails_with_cycle_detected() {
    let first = Rc::new(RefCell::new(Node {
        value: 1,
        next: None,
    }));
    let second = Rc::new(RefCell::new(Node {
        value: 2,
        next: Some(Rc::clone(&first)),
    }));
    first.borrow_mut().next = Some(Rc::clone(&second));

    let err = first.deep_copy().unwrap_err();
    assert!(matches!(err, CopyError::CycleDetected { .. }));

    first.borrow_mut().next = None;
    let acyclic = second.deep_copy().unwrap();
    assert_eq!(acyclic.borrow().value, 2);
    assert_eq!(
        acyclic
            .borrow()
            .next
            .as_ref()
            .map(|next| next.borrow().value),
        Some(1)
    );
}

#[test]
fn nesting_beyond_the_limit_fails_with_recursion_limit() {
    let mut chain = Node::default();
    for value in 1..=40 {
        chain = Node {
            value,
            next: Some(Rc::new(RefCell::new(chain))),
        };
    }

    let copier = ObjectCopier::new(&CopyConfig {
        strategy: CopyStrategy::Structural,
        max_depth: 16,
    });
    assert_eq!(
        copier.deep_copy(&chain).unwrap_err(),
        CopyError::RecursionLimitExceeded { limit: 16 }
    );

    let roomy = ObjectCopier::new(&CopyConfig {
        strategy: CopyStrategy::Structural,
        max_depth: 1_000,
    });
    assert_eq!(roomy.deep_copy(&chain).unwrap().value, 40);
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Tagged {
    name: String,
    #[serde(default = "default_tags")]
    tags: Vec<String>,
}

fn default_tags() -> Vec<String> {
    vec!["default".to_string()]
}

impl Default for Tagged {
    fn default() -> Self {
        Self {
            name: String::new(),
            tags: default_tags(),
        }
    }
}

#[test]
fn json_round_trip_replaces_collections_instead_of_merging() {
    let mut source = Tagged::default();
    source.name = "cleared".to_string();
    source.tags.clear();

    let copy = clone_json(&source).unwrap();
    assert!(copy.tags.is_empty());
    assert_eq!(copy, source);
}

#[test]
fn json_round_trip_rejects_values_json_cannot_hold() {
    let mut keyed_by_tuple = BTreeMap::new();
    keyed_by_tuple.insert((1_u8, 2_u8), "pair".to_string());
    assert!(matches!(
        clone_json(&keyed_by_tuple),
        Err(CopyError::NotSerializable { .. })
    ));

    assert!(matches!(
        clone_json(&f64::NAN),
        Err(CopyError::NotSerializable { .. })
    ));
}

#[test]
fn json_round_trip_of_absent_value_is_absent() {
    assert_eq!(clone_json_opt::<City>(None).unwrap(), None);
    let city = sample_city();
    assert_eq!(clone_json_opt(Some(&city)).unwrap(), Some(city));
}

#[test]
fn copy_matching_fields_fills_summary_from_city() {
    let city = sample_city();
    let mut summary = CityWithoutPointsOfInterestDto::default();

    copy_matching_fields(&city, &mut summary).unwrap();
    assert_eq!(summary.id, 1);
    assert_eq!(summary.name, "Antwerp");
    assert_eq!(summary.description, city.description);
}

#[derive(Debug, Serialize)]
struct WrongShape {
    id: &'static str,
}

#[test]
fn copy_matching_fields_leaves_target_untouched_on_type_mismatch() {
    let mut summary = CityWithoutPointsOfInterestDto {
        id: 3,
        name: "Paris".to_string(),
        description: None,
    };
    let before = summary.clone();

    let err = copy_matching_fields(&WrongShape { id: "three" }, &mut summary).unwrap_err();
    assert!(matches!(err, CopyError::NotSerializable { .. }));
    assert_eq!(summary, before);
}

#[test]
fn registry_copies_registered_types_only() {
    let mut registry = CopierRegistry::new();
    registry.register::<City>().register_json::<Member>();
    let mut ctx = CopyContext::default();

    let city = sample_city();
    assert_eq!(registry.copy(&city, &mut ctx).unwrap(), city);

    let member = sample_member();
    let any_copy = registry.copy_any(&member, &mut ctx).unwrap();
    assert_eq!(any_copy.downcast_ref::<Member>(), Some(&member));

    let err = registry.copy(&Comment::default(), &mut ctx).unwrap_err();
    assert!(matches!(err, CopyError::UnsupportedType { .. }));
}

#[test]
fn copier_snapshot_follows_configured_strategy() {
    let city = sample_city();
    for strategy in [CopyStrategy::Structural, CopyStrategy::JsonRoundTrip] {
        let copier = ObjectCopier::new(&CopyConfig {
            strategy,
            ..CopyConfig::default()
        });
        assert_eq!(copier.strategy(), strategy);
        assert_eq!(copier.snapshot(&city).unwrap(), city);
    }
}

#[test]
fn copier_copy_without_registration_is_unsupported() {
    let mut copier = ObjectCopier::default();
    assert!(matches!(
        copier.copy(&sample_member()),
        Err(CopyError::UnsupportedType { .. })
    ));

    copier.registry_mut().register::<Member>();
    assert_eq!(copier.copy(&sample_member()).unwrap(), sample_member());
}

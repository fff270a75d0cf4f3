use girder_graph::{Binder, GraphError, Injector, Key, Stage};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
struct Repo {
    url: String,
}

#[derive(Debug)]
struct Service {
    repo: Arc<Repo>,
}

#[test]
fn binds_and_resolves_instances() {
    let graph = Injector::builder()
        .module(|b: &mut Binder| {
            b.bind(Repo { url: "mem://".to_owned() });
            b.bind_named("primary", 7u16);
        })
        .build()
        .expect("build");

    assert_eq!(graph.get::<Repo>().expect("repo").url, "mem://");
    assert_eq!(*graph.get_named::<u16>("primary").expect("named"), 7);
    assert!(matches!(graph.get::<u16>(), Err(GraphError::MissingBinding { .. })));
}

#[test]
fn factories_see_other_bindings_and_memoize() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);

    let graph = Injector::builder()
        .module(move |b: &mut Binder| {
            b.bind(Repo { url: "mem://".to_owned() });
            let counter = Arc::clone(&counter);
            b.bind_factory(move |injector| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Service { repo: injector.get::<Repo>()? })
            });
        })
        .build()
        .expect("build");

    let first = graph.get::<Service>().expect("service");
    let second = graph.get::<Service>().expect("service again");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.repo.url, "mem://");
    assert_eq!(built.load(Ordering::SeqCst), 1);
}

#[test]
fn duplicate_key_fails_the_build() {
    let result = Injector::builder()
        .module(|b: &mut Binder| b.bind(1u32))
        .module(|b: &mut Binder| b.bind(2u32))
        .build();

    assert!(matches!(result, Err(GraphError::DuplicateBinding { .. })));
}

#[test]
fn same_type_different_names_do_not_conflict() {
    let graph = Injector::builder()
        .module(|b: &mut Binder| {
            b.bind(0u32);
            b.bind_named("left", 1u32);
            b.bind_named("right", 2u32);
        })
        .build()
        .expect("build");

    assert_eq!(*graph.get::<u32>().expect("unnamed"), 0);
    assert_eq!(*graph.get_named::<u32>("left").expect("left"), 1);
    assert_eq!(*graph.get_named::<u32>("right").expect("right"), 2);
}

#[test]
fn production_stage_surfaces_provider_failures_at_build() {
    let result = Injector::builder()
        .stage(Stage::Production)
        .module(|b: &mut Binder| {
            b.bind_factory(|_| -> Result<Repo, _> {
                Err(GraphError::provider(Key::of::<Repo>(), "backing store offline"))
            });
        })
        .build();

    assert!(matches!(result, Err(GraphError::Provider { .. })));
}

#[test]
fn development_stage_defers_provider_failures_to_lookup() {
    let graph = Injector::builder()
        .module(|b: &mut Binder| {
            b.bind_factory(|_| -> Result<Repo, _> {
                Err(GraphError::provider(Key::of::<Repo>(), "backing store offline"))
            });
        })
        .build()
        .expect("lazy build must succeed");

    assert!(matches!(graph.get::<Repo>(), Err(GraphError::Provider { .. })));
}

#[test]
fn eager_bindings_are_built_even_in_development() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);

    let _graph = Injector::builder()
        .module(move |b: &mut Binder| {
            let counter = Arc::clone(&counter);
            b.bind_eager_factory(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Repo { url: "eager".to_owned() })
            });
        })
        .build()
        .expect("build");

    assert_eq!(built.load(Ordering::SeqCst), 1);
}

#[test]
fn circular_dependency_is_detected() {
    #[derive(Debug)]
    struct A;
    #[derive(Debug)]
    struct B;

    let graph = Injector::builder()
        .module(|b: &mut Binder| {
            b.bind_factory(|injector| {
                injector.get::<B>()?;
                Ok(A)
            });
            b.bind_factory(|injector| {
                injector.get::<A>()?;
                Ok(B)
            });
        })
        .build()
        .expect("build");

    assert!(matches!(graph.get::<A>(), Err(GraphError::CircularDependency { .. })));
}

#[test]
fn child_resolves_parent_bindings_and_shadows_its_own() {
    let parent = Injector::builder()
        .module(|b: &mut Binder| {
            b.bind(Repo { url: "parent".to_owned() });
            b.bind(10u64);
        })
        .build()
        .expect("parent");

    let child = Injector::builder()
        .parent(parent.clone())
        .module(|b: &mut Binder| b.bind(20u64))
        .build()
        .expect("child");

    // Present only in the parent.
    assert_eq!(child.get::<Repo>().expect("inherited").url, "parent");
    // Shadowed in the child; the parent keeps its own value.
    assert_eq!(*child.get::<u64>().expect("shadowed"), 20);
    assert_eq!(*parent.get::<u64>().expect("parent value"), 10);
    // Parent instances are shared, not duplicated.
    assert!(Arc::ptr_eq(
        &parent.get::<Repo>().expect("parent repo"),
        &child.get::<Repo>().expect("child repo")
    ));
}

#[test]
fn contains_walks_the_parent_chain() {
    let parent = Injector::builder()
        .module(|b: &mut Binder| b.bind(Repo { url: "parent".to_owned() }))
        .build()
        .expect("parent");

    let child = Injector::builder()
        .parent(parent)
        .module(|b: &mut Binder| b.bind_named("primary", 1u32))
        .build()
        .expect("child");

    assert!(child.contains(&Key::of::<Repo>()));
    assert!(child.contains(&Key::named::<u32>("primary")));
    assert!(!child.contains(&Key::of::<u32>()));
    assert!(!child.contains(&Key::of::<u64>()));
}

#[test]
fn uncontributed_set_is_absent_not_empty() {
    let graph = Injector::builder()
        .module(|b: &mut Binder| b.bind(1u32))
        .build()
        .expect("build");

    assert!(graph.get_set::<Arc<str>>().expect("lookup").is_none());
}

#[test]
fn set_collects_contributions_across_modules() {
    let graph = Injector::builder()
        .module(|b: &mut Binder| {
            b.add_to_set::<Arc<str>>(Arc::from("one"));
            b.add_to_set::<Arc<str>>(Arc::from("two"));
        })
        .module(|b: &mut Binder| b.add_to_set::<Arc<str>>(Arc::from("three")))
        .build()
        .expect("build");

    let set = graph.get_set::<Arc<str>>().expect("lookup").expect("present");
    assert_eq!(set.len(), 3);
}

#[test]
fn two_builds_yield_distinct_instances() {
    let module = |b: &mut Binder| b.bind(Repo { url: "mem://".to_owned() });

    let first = Injector::builder().module(module).build().expect("first");
    let second = Injector::builder().module(module).build().expect("second");

    let a = first.get::<Repo>().expect("a");
    let b = second.get::<Repo>().expect("b");
    assert_eq!(a.url, b.url);
    assert!(!Arc::ptr_eq(&a, &b));
}

use popstack::{Layer, OverlayId, StackConfig, StackEntry, StackRegistry, ZIndexAllocator};

fn z_of(registry: &StackRegistry, id: &str) -> i32 {
    registry.get(&OverlayId::from(id)).unwrap().z_index
}

fn z_values(registry: &StackRegistry) -> Vec<i32> {
    registry.entries().iter().map(|e| e.z_index).collect()
}

// ============================================================================
// Allocation
// ============================================================================

#[test]
fn test_registration_uses_base_and_step() {
    let mut registry = StackRegistry::new();
    for id in ["a", "b", "c"] {
        registry.register(StackEntry::new(id)).unwrap();
    }

    assert_eq!(z_values(&registry), vec![1000, 1010, 1020]);
}

#[test]
fn test_promotion_only_renumbers_promoted_entry() {
    let mut registry = StackRegistry::new();
    for id in ["a", "b", "c"] {
        registry.register(StackEntry::new(id)).unwrap();
    }

    let z = registry.bring_to_front(&OverlayId::from("a")).unwrap();

    assert_eq!(z, 1030);
    assert_eq!(z_of(&registry, "b"), 1010);
    assert_eq!(z_of(&registry, "c"), 1020);
}

#[test]
fn test_registration_after_promotion_stays_above() {
    let mut registry = StackRegistry::new();
    for id in ["a", "b", "c"] {
        registry.register(StackEntry::new(id)).unwrap();
    }
    registry.bring_to_front(&OverlayId::from("a")).unwrap();

    registry.register(StackEntry::new("d")).unwrap();

    assert_eq!(z_of(&registry, "d"), 1040);
    assert_eq!(z_values(&registry), vec![1010, 1020, 1030, 1040]);
}

#[test]
fn test_registration_after_removal_stays_above() {
    let mut registry = StackRegistry::new();
    for id in ["a", "b", "c"] {
        registry.register(StackEntry::new(id)).unwrap();
    }
    registry.unregister(&OverlayId::from("b"));

    registry.register(StackEntry::new("d")).unwrap();

    assert_eq!(z_values(&registry), vec![1000, 1020, 1030]);
}

#[test]
fn test_empty_stack_restarts_at_base() {
    let mut registry = StackRegistry::new();
    registry.register(StackEntry::new("a")).unwrap();
    registry.register(StackEntry::new("b")).unwrap();
    registry.clear();

    registry.register(StackEntry::new("c")).unwrap();

    assert_eq!(z_of(&registry, "c"), 1000);
}

#[test]
fn test_custom_config() {
    let config = StackConfig::new().base_z_index(0).z_step(100);
    let mut registry = StackRegistry::with_config(config);
    registry.register(StackEntry::new("a")).unwrap();
    registry.register(StackEntry::new("b")).unwrap();

    assert_eq!(z_values(&registry), vec![0, 100]);
}

#[test]
fn test_promotion_renumbers_when_range_exhausted() {
    let config = StackConfig::new().base_z_index(i32::MAX - 25).z_step(10);
    let mut registry = StackRegistry::with_config(config);
    for id in ["a", "b", "c"] {
        registry.register(StackEntry::new(id)).unwrap();
    }
    assert_eq!(
        z_values(&registry),
        vec![i32::MAX - 25, i32::MAX - 15, i32::MAX - 5]
    );

    let z = registry.bring_to_front(&OverlayId::from("a")).unwrap();

    assert_eq!(z, i32::MAX - 5);
    assert_eq!(z_of(&registry, "b"), i32::MAX - 25);
    assert_eq!(z_of(&registry, "c"), i32::MAX - 15);
    assert!(z_values(&registry).windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_allocator_reports_overflow() {
    let config = StackConfig::new().base_z_index(0).z_step(10);
    let allocator = ZIndexAllocator::new(config);

    assert_eq!(allocator.for_promotion(i32::MAX - 10), Some(i32::MAX));
    assert_eq!(allocator.for_promotion(i32::MAX - 5), None);
    assert_eq!(allocator.for_registration(2, Some(i32::MAX)), None);
    assert_eq!(allocator.for_registration(2, None), Some(20));
}

#[test]
fn test_repeated_promotion_near_limit_stays_ordered() {
    let config = StackConfig::new().base_z_index(i32::MAX - 100).z_step(10);
    let mut registry = StackRegistry::with_config(config);
    for id in ["a", "b"] {
        registry.register(StackEntry::new(id)).unwrap();
    }

    for round in 0..50 {
        let bottom = registry.entries()[0].id.clone();
        registry.bring_to_front(&bottom).unwrap();
        let values = z_values(&registry);
        assert!(values[0] < values[1], "round {round}: {values:?}");
    }
}

// ============================================================================
// Internal Layers
// ============================================================================

#[test]
fn test_layers_fit_between_top_level_values() {
    let allocator = ZIndexAllocator::default();

    assert_eq!(allocator.layer(1000, Layer::Backdrop), 1000);
    assert_eq!(allocator.layer(1000, Layer::Content), 1001);
    assert_eq!(allocator.offset(1000, 50), 1009);
    assert_eq!(allocator.offset(1000, -3), 1000);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_step_is_clamped() {
    assert_eq!(StackConfig::new().z_step(1).z_step, 2);

    let allocator = ZIndexAllocator::new(StackConfig {
        base_z_index: 5,
        z_step: 0,
    });
    assert_eq!(allocator.step(), 2);
    assert_eq!(allocator.base(), 5);
}

#[test]
fn test_config_deserializes_with_defaults() {
    let config: StackConfig = serde_json::from_str(r#"{ "z_step": 5 }"#).unwrap();

    assert_eq!(config.base_z_index, 1000);
    assert_eq!(config.z_step, 5);

    let empty: StackConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, StackConfig::default());
}

// Integration tests test your crate's public API. They only have access to items
// in your crate that are marked pub. See the Cargo Targets page of the Cargo Book
// for more information.
//
//   https://doc.rust-lang.org/cargo/reference/cargo-targets.html#integration-tests
//

use plantsim_remote::*;

mod cli_argument_parsing_tests;
mod table_bridge_tests;

#[test]
fn test_enum_types() {
    for license in LicenseType::ALL {
        assert_eq!(license.to_string(), license.as_engine_str());
        assert_eq!(license.to_string().to_lowercase().parse::<LicenseType>(), Ok(license));
    }

    for mode in [ExplorerMode::Watch, ExplorerMode::Edit, ExplorerMode::Read] {
        assert_eq!(mode.as_engine_str().parse::<ExplorerMode>(), Ok(mode));
    }
    assert!("Paused".parse::<ExplorerMode>().is_err());
}

#[test]
fn test_value_conversions() {
    assert_eq!(Value::from(42), Value::Integer(42));
    assert_eq!(Value::from(2.5), Value::Real(2.5));
    assert_eq!(Value::from("Drill"), Value::Str("Drill".to_string()));
    assert_eq!(Value::from(None::<i64>), Value::Empty);
    assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
    assert_eq!(serde_json::to_string(&Value::Empty).unwrap(), "null");
}

#[test]
fn test_fault_classification() {
    let license = AutomationFault::facility_unavailable("no license");
    assert_eq!(classify(&license), Some(FaultCode::FACILITY_UNAVAILABLE));
    assert_eq!(FaultCode::FACILITY_UNAVAILABLE.0, -2147221503);

    let plain = AutomationFault::new(automation::E_FAIL, "Unspecified error");
    assert_eq!(classify(&plain), None);
}

#[test]
fn test_connection_error_after_failed_rebuild() {
    let dispatcher = MemoryDispatcher::new(MemoryEngine::new()).with_corrupted_cache(2);

    let error = Session::connect(&dispatcher, None).unwrap_err();

    assert_eq!(error.category(), "Connection");
    assert!(error.to_string().contains("Tecnomatix.PlantSimulation.RemoteControl"));
    assert_eq!(dispatcher.cache_clears(), 1);
}

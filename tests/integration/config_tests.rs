//! Loading configuration through the port.

use super::mock_ports::{MemoryConfig, RecordingSink};

use dolstarter::app::events::StarterEvent;
use dolstarter::app::ports::{ConfigError, ConfigPort};
use dolstarter::app::service::MotorStarter;
use dolstarter::config::StarterConfig;
use dolstarter::error::Error;
use dolstarter::fsm::MotorState;

#[test]
fn empty_store_starts_with_defaults() {
    let port = MemoryConfig::new();
    let starter = MotorStarter::from_port(&port, RecordingSink::new()).unwrap();
    assert_eq!(starter.config(), &StarterConfig::default());
    assert_eq!(starter.snapshot().rated_rpm, 1480);
    assert_eq!(
        starter.sink().events,
        [StarterEvent::Started(MotorState::Stopped)]
    );
}

#[test]
fn saved_config_shapes_the_session() {
    let port = MemoryConfig::new();
    let config = StarterConfig {
        rated_rpm: 2960,
        system_voltage: 690,
        ..StarterConfig::default()
    };
    port.save(&config).unwrap();

    let starter = MotorStarter::from_port(&port, RecordingSink::new()).unwrap();
    let snap = starter.snapshot();
    assert_eq!(snap.rated_rpm, 2960);
    assert_eq!(snap.system_voltage, 690);
}

#[test]
fn invalid_stored_config_is_rejected() {
    let port = MemoryConfig::with_raw(StarterConfig {
        running_threshold: 1.5,
        ..StarterConfig::default()
    });
    let result = MotorStarter::from_port(&port, RecordingSink::new());
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::ValidationFailed(_)))
    ));
}

#[test]
fn save_validates_first() {
    let port = MemoryConfig::new();
    let bad = StarterConfig {
        trip_state: MotorState::Running,
        ..StarterConfig::default()
    };
    assert!(port.save(&bad).is_err());
    assert_eq!(port.load().unwrap(), StarterConfig::default());
}

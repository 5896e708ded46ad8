//! Static name tables for standard Bluetooth SIG attributes.

use super::identifier::GattUuid;

/// Human-readable name and SIG type string of a standard attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownAttribute {
    pub name: &'static str,
    pub kind: &'static str,
}

const fn entry(id: u16, name: &'static str, kind: &'static str) -> (u16, KnownAttribute) {
    (id, KnownAttribute { name, kind })
}

static SERVICES: &[(u16, KnownAttribute)] = &[
    entry(0x1800, "Generic Access", "org.bluetooth.service.generic_access"),
    entry(0x1801, "Generic Attribute", "org.bluetooth.service.generic_attribute"),
    entry(0x1802, "Immediate Alert", "org.bluetooth.service.immediate_alert"),
    entry(0x1803, "Link Loss", "org.bluetooth.service.link_loss"),
    entry(0x1804, "Tx Power", "org.bluetooth.service.tx_power"),
    entry(0x1805, "Current Time Service", "org.bluetooth.service.current_time"),
    entry(
        0x1806,
        "Reference Time Update Service",
        "org.bluetooth.service.reference_time_update",
    ),
    entry(0x1807, "Next DST Change Service", "org.bluetooth.service.next_dst_change"),
    entry(0x1808, "Glucose", "org.bluetooth.service.glucose"),
    entry(0x1809, "Health Thermometer", "org.bluetooth.service.health_thermometer"),
    entry(0x180a, "Device Information", "org.bluetooth.service.device_information"),
    entry(0x180d, "Heart Rate", "org.bluetooth.service.heart_rate"),
    entry(
        0x180e,
        "Phone Alert Status Service",
        "org.bluetooth.service.phone_alert_service",
    ),
    entry(0x180f, "Battery Service", "org.bluetooth.service.battery_service"),
    entry(0x1810, "Blood Pressure", "org.bluetooth.service.blood_pressure"),
    entry(
        0x1811,
        "Alert Notification Service",
        "org.bluetooth.service.alert_notification",
    ),
    entry(
        0x1812,
        "Human Interface Device",
        "org.bluetooth.service.human_interface_device",
    ),
    entry(0x1813, "Scan Parameters", "org.bluetooth.service.scan_parameters"),
    entry(
        0x1814,
        "Running Speed and Cadence",
        "org.bluetooth.service.running_speed_and_cadence",
    ),
    entry(
        0x1815,
        "Cycling Speed and Cadence",
        "org.bluetooth.service.cycling_speed_and_cadence",
    ),
];

static CHARACTERISTICS: &[(u16, KnownAttribute)] = &[
    entry(0x2a00, "Device Name", "org.bluetooth.characteristic.gap.device_name"),
    entry(0x2a01, "Appearance", "org.bluetooth.characteristic.gap.appearance"),
    entry(
        0x2a02,
        "Peripheral Privacy Flag",
        "org.bluetooth.characteristic.gap.peripheral_privacy_flag",
    ),
    entry(
        0x2a03,
        "Reconnection Address",
        "org.bluetooth.characteristic.gap.reconnection_address",
    ),
    entry(
        0x2a04,
        "Peripheral Preferred Connection Parameters",
        "org.bluetooth.characteristic.gap.peripheral_preferred_connection_parameters",
    ),
    entry(
        0x2a05,
        "Service Changed",
        "org.bluetooth.characteristic.gatt.service_changed",
    ),
    entry(0x2a06, "Alert Level", "org.bluetooth.characteristic.alert_level"),
    entry(0x2a07, "Tx Power Level", "org.bluetooth.characteristic.tx_power_level"),
    entry(0x2a08, "Date Time", "org.bluetooth.characteristic.date_time"),
    entry(0x2a19, "Battery Level", "org.bluetooth.characteristic.battery_level"),
    entry(0x2a1c, "Temperature Measurement", "org.bluetooth.characteristic.temperature_measurement"),
    entry(0x2a23, "System ID", "org.bluetooth.characteristic.system_id"),
    entry(0x2a24, "Model Number String", "org.bluetooth.characteristic.model_number_string"),
    entry(0x2a25, "Serial Number String", "org.bluetooth.characteristic.serial_number_string"),
    entry(
        0x2a26,
        "Firmware Revision String",
        "org.bluetooth.characteristic.firmware_revision_string",
    ),
    entry(
        0x2a27,
        "Hardware Revision String",
        "org.bluetooth.characteristic.hardware_revision_string",
    ),
    entry(
        0x2a28,
        "Software Revision String",
        "org.bluetooth.characteristic.software_revision_string",
    ),
    entry(
        0x2a29,
        "Manufacturer Name String",
        "org.bluetooth.characteristic.manufacturer_name_string",
    ),
    entry(0x2a2b, "Current Time", "org.bluetooth.characteristic.current_time"),
    entry(0x2a37, "Heart Rate Measurement", "org.bluetooth.characteristic.heart_rate_measurement"),
    entry(0x2a38, "Body Sensor Location", "org.bluetooth.characteristic.body_sensor_location"),
    entry(0x2a39, "Heart Rate Control Point", "org.bluetooth.characteristic.heart_rate_control_point"),
    entry(0x2a4d, "Report", "org.bluetooth.characteristic.report"),
    entry(0x2a50, "PnP ID", "org.bluetooth.characteristic.pnp_id"),
];

static DESCRIPTORS: &[(u16, KnownAttribute)] = &[
    entry(
        0x2900,
        "Characteristic Extended Properties",
        "org.bluetooth.descriptor.gatt.characteristic_extended_properties",
    ),
    entry(
        0x2901,
        "Characteristic User Description",
        "org.bluetooth.descriptor.gatt.characteristic_user_description",
    ),
    entry(
        0x2902,
        "Client Characteristic Configuration",
        "org.bluetooth.descriptor.gatt.client_characteristic_configuration",
    ),
    entry(
        0x2903,
        "Server Characteristic Configuration",
        "org.bluetooth.descriptor.gatt.server_characteristic_configuration",
    ),
    entry(
        0x2904,
        "Characteristic Presentation Format",
        "org.bluetooth.descriptor.gatt.characteristic_presentation_format",
    ),
    entry(
        0x2905,
        "Characteristic Aggregate Format",
        "org.bluetooth.descriptor.gatt.characteristic_aggregate_format",
    ),
    entry(0x2906, "Valid Range", "org.bluetooth.descriptor.valid_range"),
    entry(
        0x2907,
        "External Report Reference",
        "org.bluetooth.descriptor.external_report_reference",
    ),
    entry(0x2908, "Report Reference", "org.bluetooth.descriptor.report_reference"),
];

fn find(table: &'static [(u16, KnownAttribute)], uuid: GattUuid) -> Option<KnownAttribute> {
    let GattUuid::Short16(short) = uuid else {
        return None;
    };
    table
        .iter()
        .find(|(id, _)| *id == short)
        .map(|(_, known)| *known)
}

pub fn service(uuid: GattUuid) -> Option<KnownAttribute> {
    find(SERVICES, uuid)
}

pub fn characteristic(uuid: GattUuid) -> Option<KnownAttribute> {
    find(CHARACTERISTICS, uuid)
}

pub fn descriptor(uuid: GattUuid) -> Option<KnownAttribute> {
    find(DESCRIPTORS, uuid)
}

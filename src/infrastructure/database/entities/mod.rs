//! Database entities module

pub mod apartment;
pub mod house;
pub mod tariff;
pub mod water_meter;
pub mod water_reading;

pub use apartment::Entity as Apartment;
pub use house::Entity as House;
pub use tariff::Entity as Tariff;
pub use water_meter::Entity as WaterMeter;
pub use water_reading::Entity as WaterReading;

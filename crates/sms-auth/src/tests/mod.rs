mod fakes;
mod navigator;
mod property_tests;

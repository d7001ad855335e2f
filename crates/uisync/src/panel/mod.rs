// Panel editor fixtures
//
// Locators and steps for the dashboard panel editor of the data source
// plugin under test. These are fixtures built on the synchronization core,
// not a model of the dashboarding application.

pub mod locators;
pub mod steps;

//! Domain layer: pure deal and lobby logic, no HTTP or DB concerns.

pub mod actions;
pub mod deal_flow;

#[cfg(test)]
mod tests_actions;
#[cfg(test)]
mod tests_deal_flow;
#[cfg(test)]
mod tests_props_deal_flow;

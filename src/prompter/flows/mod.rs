pub mod main_flow;
#[cfg(test)]
mod tests;

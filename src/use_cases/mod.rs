pub mod fetch_tenant;

#[cfg(test)]
pub(crate) mod test_support;

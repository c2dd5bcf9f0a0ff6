pub mod tenant_validation;

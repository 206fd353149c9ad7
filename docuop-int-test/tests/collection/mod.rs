mod find_test;
mod index_test;
mod remove_test;
mod tenant_test;
mod update_test;

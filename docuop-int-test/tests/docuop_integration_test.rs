mod collection;
mod database;

#[ctor::ctor]
fn init() {
    colog::init();
}

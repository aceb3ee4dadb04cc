use rocket_dyn_templates::tera::Tera;
use rocket_dyn_templates::Engines;

mod filters;

pub(crate) fn configure_template_engines(engines: &mut Engines) {
    configure_tera(&mut engines.tera);
}

pub(crate) fn configure_tera(tera: &mut Tera) {
    filters::register_filters(tera);
}

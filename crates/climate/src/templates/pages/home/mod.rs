use maud::{html, Markup};

use crate::templates::layouts::{base, PageConfig};

pub struct RouteLink<'a> {
    pub path: &'a str,
    pub description: &'a str,
}

pub fn home_page(api_base: &str, earliest: &str, latest: &str, routes: &[RouteLink]) -> Markup {
    let config = PageConfig {
        title: "Climate API",
        api_base,
    };

    base(&config, content(api_base, earliest, latest, routes))
}

fn content(api_base: &str, earliest: &str, latest: &str, routes: &[RouteLink]) -> Markup {
    html! {
        div class="box" {
            p class="mb-4" {
                "Welcome to the climate app! Today we explore precipitation and temperature in Oahu, HI."
            }
            p class="mb-4" {
                "Observations on record run from "
                strong { (earliest) }
                " to "
                strong { (latest) }
                "."
            }

            h2 class="title is-5" { "Available Routes" }
            table class="table is-fullwidth is-striped" {
                tbody {
                    @for route in routes {
                        tr {
                            td {
                                code { (api_base) (route.path) }
                            }
                            td { (route.description) }
                        }
                    }
                }
            }
        }
    }
}

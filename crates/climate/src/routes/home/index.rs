use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::{
    templates::{home_page, RouteLink},
    AppState,
};

const ROUTES: &[RouteLink<'static>] = &[
    RouteLink {
        path: "/api/v1.0/stations",
        description: "Weather stations with observations, with name, elevation and coordinates",
    },
    RouteLink {
        path: "/api/v1.0/precipitation",
        description: "Precipitation by date and station for the last year on record",
    },
    RouteLink {
        path: "/api/v1.0/precipitation/all",
        description: "Every precipitation reading as a flat list",
    },
    RouteLink {
        path: "/api/v1.0/tobs",
        description: "Temperature observations by date and station for the last year on record",
    },
    RouteLink {
        path: "/api/v1.0/{start}",
        description: "Temperature and precipitation summary from a start date onwards",
    },
    RouteLink {
        path: "/api/v1.0/{start}/{end}",
        description: "Temperature and precipitation summary between two dates",
    },
    RouteLink {
        path: "/api/v1.0/summary?start=&end=",
        description: "Summary with the dates as query parameters; end defaults to the last day on record",
    },
];

/// List all available api routes
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(
        home_page(
            &state.remote_url,
            state.domain.earliest(),
            state.domain.latest(),
            ROUTES,
        )
        .into_string(),
    )
}

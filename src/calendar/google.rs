//! GoogleCalendarClient - Provisioner basato sulla Google Calendar REST API

use super::{CalendarError, CalendarProvisioner, MeetingRequest, ProvisionedMeeting};
use crate::core::Config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

pub struct GoogleCalendarClient {
    client: Client,
    api_url: String,
    calendar_id: String,
    time_zone: String,
}

impl GoogleCalendarClient {
    pub fn new(
        api_url: &str,
        calendar_id: &str,
        time_zone: &str,
        timeout_secs: u64,
    ) -> Result<Self, CalendarError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CalendarError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            calendar_id: calendar_id.to_string(),
            time_zone: time_zone.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, CalendarError> {
        Self::new(
            &config.calendar_api_url,
            &config.calendar_id,
            &config.calendar_time_zone,
            config.calendar_timeout_secs,
        )
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.api_url, self.calendar_id)
    }
}

// ********************* PAYLOAD GOOGLE CALENDAR **********************//

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventBody<'a> {
    summary: &'a str,
    start: EventDateTime<'a>,
    end: EventDateTime<'a>,
    attendees: Vec<Attendee<'a>>,
    conference_data: ConferenceRequestBody<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventDateTime<'a> {
    date_time: String,
    time_zone: &'a str,
}

#[derive(Serialize)]
struct Attendee<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConferenceRequestBody<'a> {
    create_request: CreateConferenceRequest<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateConferenceRequest<'a> {
    request_id: &'a str,
    conference_solution_key: ConferenceSolutionKey,
}

#[derive(Serialize)]
struct ConferenceSolutionKey {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventResponse {
    id: Option<String>,
    hangout_link: Option<String>,
    conference_data: Option<ConferenceData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConferenceData {
    #[serde(default)]
    entry_points: Vec<EntryPoint>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryPoint {
    entry_point_type: String,
    uri: String,
}

impl EventResponse {
    /// `hangoutLink` se presente, altrimenti l'entry point video della conferenza
    fn join_link(self) -> Option<String> {
        self.hangout_link.or_else(|| {
            self.conference_data?
                .entry_points
                .into_iter()
                .find(|ep| ep.entry_point_type == "video")
                .map(|ep| ep.uri)
        })
    }
}

#[async_trait]
impl CalendarProvisioner for GoogleCalendarClient {
    #[instrument(skip(self, request), fields(request_key = %request.request_key))]
    async fn create_meeting(
        &self,
        request: &MeetingRequest,
    ) -> Result<ProvisionedMeeting, CalendarError> {
        debug!("Creating calendar event with conferencing");
        let body = EventBody {
            summary: &request.summary,
            start: EventDateTime {
                date_time: request.window.start.to_rfc3339(),
                time_zone: &self.time_zone,
            },
            end: EventDateTime {
                date_time: request.window.end.to_rfc3339(),
                time_zone: &self.time_zone,
            },
            attendees: vec![Attendee {
                email: &request.attendee_email,
            }],
            conference_data: ConferenceRequestBody {
                create_request: CreateConferenceRequest {
                    request_id: &request.request_key,
                    conference_solution_key: ConferenceSolutionKey {
                        kind: "hangoutsMeet",
                    },
                },
            },
        };

        let response = self
            .client
            .post(self.events_url())
            .query(&[("conferenceDataVersion", "1")])
            .bearer_auth(&request.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Calendar request failed: {}", e);
                CalendarError::Transport(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            warn!("Calendar API rejected the access token: {}", status);
            return Err(CalendarError::Unauthorized {
                status: status.as_u16(),
                body,
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Calendar API returned {}: {}", status, body);
            return Err(CalendarError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let event: EventResponse = response
            .json()
            .await
            .map_err(|e| CalendarError::InvalidResponse(e.to_string()))?;

        let event_id = event.id.clone();
        let link = event.join_link().ok_or_else(|| {
            warn!("Calendar event created without conferencing data");
            CalendarError::MissingConference
        })?;

        info!("Calendar event created with meeting link");
        Ok(ProvisionedMeeting { event_id, link })
    }
}

use std::sync::Arc;
use std::time::Instant;

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ai::HintService;
use crate::config::WsSettings;
use crate::domain::PlayerId;
use crate::errors::{ErrorCode, GameError};
use crate::services::room_flow::RoomFlow;
use crate::state::app_state::AppState;
use crate::ws::hub::{Deliver, WsHub};
use crate::ws::protocol::{ClientMsg, ServerMsg};

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(
        Uuid::new_v4(),
        app_state.flow.clone(),
        app_state.hub.clone(),
        app_state.hints.clone(),
        app_state.ws,
    );
    ws::start(session, &req, stream)
}

/// One websocket connection. Its id doubles as the participant id.
pub struct WsSession {
    conn_id: PlayerId,
    flow: Arc<RoomFlow>,
    hub: Arc<WsHub>,
    hints: HintService,
    settings: WsSettings,
    last_heartbeat: Instant,
}

impl WsSession {
    fn new(
        conn_id: PlayerId,
        flow: Arc<RoomFlow>,
        hub: Arc<WsHub>,
        hints: HintService,
        settings: WsSettings,
    ) -> Self {
        Self {
            conn_id,
            flow,
            hub,
            hints,
            settings,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_game_error(ctx: &mut ws::WebsocketContext<Self>, err: &GameError) {
        Self::send_json(ctx, &ServerMsg::from(err));
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        let client_timeout = self.settings.client_timeout;
        ctx.run_interval(self.settings.heartbeat_interval, move |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > client_timeout {
                warn!(conn_id = %actor.conn_id, "[WS SESSION] heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    fn dispatch(&mut self, cmd: ClientMsg, ctx: &mut ws::WebsocketContext<Self>) {
        let conn = self.conn_id;
        let result = match cmd {
            ClientMsg::CreateRoom { display_name } => {
                self.flow.create_room(conn, &display_name).map(drop)
            }
            ClientMsg::JoinRoom {
                room_code,
                display_name,
            } => self.flow.join_room(conn, &room_code, &display_name).map(drop),
            ClientMsg::StartGame {
                room_code,
                game_mode,
            } => self.flow.start_game(conn, &room_code, game_mode).map(drop),
            ClientMsg::EndSpeaking { room_code } => {
                self.flow.end_speaking(conn, &room_code).map(drop)
            }
            ClientMsg::Vote {
                room_code,
                target_player_id,
            } => self
                .flow
                .vote(conn, &room_code, target_player_id)
                .map(drop),
            ClientMsg::RequestHint { room_code } => {
                self.spawn_hint(&room_code, ctx);
                Ok(())
            }
        };

        if let Err(err) = result {
            Self::send_game_error(ctx, &err);
        }
    }

    /// Hints are fetched off the actor and answered to this connection only.
    fn spawn_hint(&self, room_code: &str, ctx: &mut ws::WebsocketContext<Self>) {
        let (word, role) = match self.flow.hint_subject(self.conn_id, room_code) {
            Ok(subject) => subject,
            Err(err) => {
                Self::send_game_error(ctx, &err);
                return;
            }
        };

        let hints = self.hints.clone();
        ctx.spawn(
            async move { hints.hint_for(word.as_deref(), role).await }
                .into_actor(self)
                .map(|hint, _actor, ctx| {
                    Self::send_json(ctx, &ServerMsg::Hint { hint });
                }),
        );
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, "[WS SESSION] started");
        self.hub
            .register_connection(self.conn_id, ctx.address().recipient::<Deliver>());
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.flow.disconnect(self.conn_id);
        self.hub.unregister_connection(self.conn_id);
        info!(conn_id = %self.conn_id, "[WS SESSION] stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(cmd) => self.dispatch(cmd, ctx),
                    Err(err) => {
                        debug!(conn_id = %self.conn_id, error = %err, "[WS SESSION] malformed message");
                        Self::send_json(
                            ctx,
                            &ServerMsg::error(ErrorCode::BadRequest, "Malformed message"),
                        );
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                Self::send_json(
                    ctx,
                    &ServerMsg::error(ErrorCode::BadRequest, "Binary not supported"),
                );
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(conn_id = %self.conn_id, error = %err, "[WS SESSION] protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<Deliver> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: Deliver, ctx: &mut Self::Context) -> Self::Result {
        Self::send_json(ctx, &msg.0);
    }
}

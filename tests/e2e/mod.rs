// End-to-end tests for the TTS gateway HTTP API
//
// Each test boots the real router on an ephemeral port. Google OAuth, Google
// Cloud TTS and OpenAI are replaced by one httpmock server per test, and the
// Google credentials are an authorized_user file in a temp directory whose
// token_uri points at that mock server. Nothing leaves the machine.

mod helpers;

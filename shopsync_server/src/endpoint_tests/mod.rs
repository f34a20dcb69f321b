mod helpers;
mod orders;
mod webhooks;

mod health_check;
mod preferences;
mod subscribe;
mod unsubscribe;

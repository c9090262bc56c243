//! Script-side runtime and generated bindings.
//!
//! The runtime object lives at `window.<global>` and owns call-id
//! allocation, promise bookkeeping, and event listeners. Bindings add one
//! async function per exposed method and one accessor per property.

use std::fmt::Write as _;

use crate::bridge::BridgeOptions;
use crate::registry::{AccessKind, MethodRegistry, PROPERTY_VALUE_ARG};

const GLOBAL_PLACEHOLDER: &str = "__WITO_GLOBAL__";

const RUNTIME_TEMPLATE: &str = r#"
(function() {
    if (window.__WITO_GLOBAL__ && window.__WITO_GLOBAL__._invoke) { return; }
    var rt = {
        callId: 0,
        pendingCalls: {},
        eventListeners: {},
        readyCallbacks: [],
        isReady: false,
        devMode: __WITO_DEV_MODE__,
        appDevMode: __APP_DEV_MODE__,

        _invoke: function(method, args) {
            var self = this;
            return new Promise(function(resolve, reject) {
                var id = String(self.callId++);
                self.pendingCalls[id] = { resolve: resolve, reject: reject };
                if (!(window.ipc && window.ipc.postMessage)) {
                    delete self.pendingCalls[id];
                    reject(new Error('IPC channel not available'));
                    return;
                }
                var message = JSON.stringify({ id: id, method: method, args: args || {} });
                if (self.devMode) { console.log('wito -> host: ' + message); }
                window.ipc.postMessage(message);
            });
        },

        _resolveCall: function(id, result) {
            var call = this.pendingCalls[id];
            if (!call) { console.warn('No pending call found for id: ' + id); return; }
            delete this.pendingCalls[id];
            if (this.devMode) { console.log('wito <- host: resolve ' + id); }
            call.resolve(result);
        },

        _rejectCall: function(id, message) {
            var call = this.pendingCalls[id];
            if (!call) { console.warn('No pending call found for id: ' + id); return; }
            delete this.pendingCalls[id];
            if (this.devMode) { console.log('wito <- host: reject ' + id + ': ' + message); }
            call.reject(new Error(message));
        },

        on: function(event, callback) {
            (this.eventListeners[event] = this.eventListeners[event] || []).push(callback);
        },

        _emitEvent: function(event, data) {
            var listeners = this.eventListeners[event] || [];
            for (var i = 0; i < listeners.length; i++) {
                try { listeners[i](data); } catch (e) { console.error(e); }
            }
        },

        onReady: function(callback) {
            if (this.isReady) { callback(); } else { this.readyCallbacks.push(callback); }
        },

        _setReady: function() {
            this.isReady = true;
            var callbacks = this.readyCallbacks;
            this.readyCallbacks = [];
            for (var i = 0; i < callbacks.length; i++) { callbacks[i](); }
        },

        // Descriptors only: reading a property would invoke the host.
        getAllObjects: function() {
            var self = this;
            return Object.getOwnPropertyNames(self).filter(function(n) {
                var d = Object.getOwnPropertyDescriptor(self, n);
                return d && (d.get || d.value);
            });
        },

        getAllMethods: function() {
            var self = this;
            return Object.getOwnPropertyNames(self)
                .filter(function(n) {
                    var d = Object.getOwnPropertyDescriptor(self, n);
                    return n.charAt(0) !== '_' && d && typeof d.value === 'function';
                })
                .map(function(n) { return n + '()'; });
        },

        getAllProperties: function() {
            return (this._properties || []).slice();
        }
    };
    window.__WITO_GLOBAL__ = rt;
})();
"#;

/// The runtime object, installed at `window.<global>`.
pub fn runtime_script(global: &str, dev_mode: bool, app_dev_mode: bool) -> String {
    RUNTIME_TEMPLATE
        .replace(GLOBAL_PLACEHOLDER, global)
        .replace("__WITO_DEV_MODE__", bool_literal(dev_mode))
        .replace("__APP_DEV_MODE__", bool_literal(app_dev_mode))
}

/// One stub per exposed operation, in registration order.
pub fn bindings_script(registry: &MethodRegistry, global: &str) -> String {
    let mut js = String::from("(function() {\n");
    let _ = writeln!(js, "    var g = window.{global};");

    for op in registry.methods() {
        let params = op.params().join(", ");
        let args = op
            .params()
            .iter()
            .map(|p| format!("{p}: {p}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            js,
            "    g.{name} = function({params}) {{ return g._invoke('{name}', {{{args}}}); }};",
            name = op.name(),
        );
    }

    let mut properties = Vec::new();
    for (name, access) in registry.properties() {
        let setter = match access {
            AccessKind::ReadWriteProperty => format!(
                ", set: function(v) {{ g._invoke('{name}', {{{PROPERTY_VALUE_ARG}: v}}); }}"
            ),
            _ => String::new(),
        };
        let _ = writeln!(
            js,
            "    Object.defineProperty(g, '{name}', {{ configurable: true, enumerable: true, get: function() {{ return g._invoke('{name}', {{}}); }}{setter} }});"
        );
        properties.push(format!("'{name}'"));
    }
    let _ = writeln!(js, "    g._properties = [{}];", properties.join(", "));

    js.push_str("})();\n");
    js
}

/// Everything the content view needs before any page script runs.
pub fn init_script(registry: &MethodRegistry, options: &BridgeOptions) -> String {
    let mut js = runtime_script(&options.global_name, options.dev_mode, options.app_dev_mode);
    if options.generate_bindings {
        js.push_str(&bindings_script(registry, &options.global_name));
    }
    let _ = writeln!(js, "window.{}._setReady();", options.global_name);
    js
}

fn bool_literal(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

//! Server-rendered chat page.
//!
//! One page, no routes beyond `/`. The shell carries only the document
//! skeleton; everything with literal braces (styles, the client script)
//! lives in the static content string so the shell can stay a plain
//! format template.

/// Generate the HTML shell for the application.
pub fn html_shell(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="A Renaissance persona chat">
    <title>{title} - Lorenzo de' Medici</title>
</head>
<body>
{content}
</body>
</html>"#
    )
}

/// Chat page content: persona header, message area, input form, and the
/// client script.
///
/// The script keeps the conversation as an ordered in-memory list for the
/// lifetime of the page, posts the full list on every send, and appends
/// exactly one assistant turn per round trip (the relay reply, or the
/// fixed fallback when no usable reply arrived). Sends are refused while
/// one is outstanding, covering both the button and rapid Enter presses.
pub fn chat_content() -> &'static str {
    r#"
    <style>
        * { box-sizing: border-box; }
        body {
            margin: 0;
            min-height: 100vh;
            display: flex;
            flex-direction: column;
            font-family: 'Garamond', 'EB Garamond', serif;
            background: linear-gradient(160deg, #f3e5c3 0%, #e8d5a8 55%, #dcc28d 100%);
        }
        header.persona {
            background: rgba(102, 51, 0, 0.85);
            color: antiquewhite;
            text-align: center;
            padding: 16px;
            font-size: 24px;
            border-bottom: 4px solid #3e1f00;
            letter-spacing: 1px;
        }
        #chat {
            flex: 1;
            padding: 30px;
            overflow-y: auto;
            display: flex;
            flex-direction: column;
            gap: 14px;
        }
        .bubble {
            max-width: 70%;
            padding: 12px 16px;
            border-radius: 12px;
            line-height: 1.45;
            white-space: pre-wrap;
            box-shadow: 0 1px 3px rgba(62, 31, 0, 0.3);
        }
        .bubble.assistant {
            align-self: flex-start;
            background: #fdf6e3;
            color: #3e1f00;
            border: 1px solid #c9a86a;
        }
        .bubble.user {
            align-self: flex-end;
            background: #663300;
            color: antiquewhite;
        }
        #loading {
            align-self: flex-start;
            font-style: italic;
            color: #6b4a1f;
            padding: 0 16px;
        }
        form.composer {
            display: flex;
            gap: 10px;
            padding: 16px 30px;
            background: rgba(102, 51, 0, 0.12);
            border-top: 2px solid #3e1f00;
        }
        form.composer input {
            flex: 1;
            padding: 12px 14px;
            font: inherit;
            border: 1px solid #8a5a20;
            border-radius: 8px;
            background: #fdf6e3;
            color: #3e1f00;
        }
        form.composer button {
            padding: 12px 24px;
            font: inherit;
            border: none;
            border-radius: 8px;
            background: #663300;
            color: antiquewhite;
            cursor: pointer;
        }
        form.composer button:disabled {
            opacity: 0.5;
            cursor: not-allowed;
        }
    </style>

    <header class="persona">Lorenzo de' Medici &mdash; A Voice from the Renaissance</header>

    <div id="chat"></div>
    <div id="loading" hidden>Lorenzo is pondering&hellip;</div>

    <form class="composer" id="composer">
        <input id="prompt" type="text" autocomplete="off"
               placeholder="Ask of art, of Florence, of the rebirth of man..." autofocus>
        <button id="send" type="submit">Send</button>
    </form>

    <script>
        const FALLBACK = "Forgive me, something went amiss.";
        const messages = [
            {
                role: "assistant",
                content: "Greetings. I am Lorenzo de' Medici, patron of the arts and of humanity's reawakening. What would you ask of the Renaissance?"
            }
        ];
        let sending = false;

        const chatEl = document.getElementById("chat");
        const inputEl = document.getElementById("prompt");
        const buttonEl = document.getElementById("send");
        const loadingEl = document.getElementById("loading");

        function render() {
            chatEl.replaceChildren();
            for (const m of messages) {
                const bubble = document.createElement("div");
                bubble.className = "bubble " + m.role;
                bubble.textContent = m.content;
                chatEl.appendChild(bubble);
            }
            loadingEl.hidden = !sending;
            chatEl.scrollTop = chatEl.scrollHeight;
        }

        async function send() {
            const text = inputEl.value.trim();
            if (!text || sending) return;

            messages.push({ role: "user", content: text });
            inputEl.value = "";
            sending = true;
            buttonEl.disabled = true;
            render();

            let reply = null;
            try {
                const response = await fetch("/api/chat", {
                    method: "POST",
                    headers: { "Content-Type": "application/json" },
                    body: JSON.stringify({ messages: messages })
                });
                const data = await response.json();
                if (data && typeof data.reply === "string" && data.reply) {
                    reply = data.reply;
                }
            } catch (err) {
                reply = null;
            }

            messages.push({ role: "assistant", content: reply !== null ? reply : FALLBACK });
            sending = false;
            buttonEl.disabled = false;
            render();
            inputEl.focus();
        }

        document.getElementById("composer").addEventListener("submit", (ev) => {
            ev.preventDefault();
            send();
        });

        render();
    </script>
    "#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_embeds_title_and_content() {
        let page = html_shell("Chat", "<p>hello</p>");
        assert!(page.contains("<title>Chat - Lorenzo de' Medici</title>"));
        assert!(page.contains("<p>hello</p>"));
    }

    #[test]
    fn test_chat_page_carries_persona_greeting_and_fallback() {
        let content = chat_content();
        assert!(content.contains("I am Lorenzo de' Medici"));
        assert!(content.contains("Forgive me, something went amiss."));
    }
}
